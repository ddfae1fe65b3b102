//! Pool Ownership Tests
//!
//! Buffers move between pipeline workers one owner at a time and go back to
//! the pool only when the last stage drops them.

use std::sync::mpsc;
use std::thread;

use dp_abi::{MdFlags, VifIndex};
use dp_packet::{PacketPool, PoolConfig, metadata_of};

#[test]
fn packets_move_between_stages() {
    let pool = PacketPool::new(PoolConfig::new("pipeline", 64)).expect("pool");
    let (classified_tx, classified_rx) = mpsc::channel();
    let stages = &pool;

    thread::scope(|s| {
        // classification stage
        s.spawn(move || {
            for i in 0..64u16 {
                let mut pkt = stages.alloc().expect("alloc");
                let md = pkt.metadata_mut();
                md.set_in_vif(VifIndex::new(i % 4095 + 1).unwrap());
                if i % 2 == 0 {
                    md.insert_flags(MdFlags::SELF);
                }
                classified_tx.send((i, pkt)).expect("send");
            }
        });

        // forwarding stage
        s.spawn(move || {
            for (i, mut pkt) in classified_rx {
                let md = pkt.metadata_mut();
                assert_eq!(md.in_vif().as_u16(), i % 4095 + 1);
                assert_eq!(md.flags().contains(MdFlags::SELF), i % 2 == 0);
                md.set_out_vif(VifIndex::new(7).unwrap());
                md.insert_flags(MdFlags::MAT);
                assert!(md.flags().contains(MdFlags::MAT));
                assert_eq!(md.check_indices(), Ok(()));
            }
        });
    });

    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), 64);
}

#[test]
fn workers_never_share_a_buffer() {
    let pool = PacketPool::new(PoolConfig::new("workers", 16)).expect("pool");

    thread::scope(|s| {
        for worker in 0..4u16 {
            let pool = &pool;
            s.spawn(move || {
                for _ in 0..1000 {
                    let Some(mut pkt) = pool.alloc() else {
                        continue;
                    };
                    let vif = VifIndex::new(worker + 1).unwrap();
                    pkt.metadata_mut().set_in_vif(vif);
                    pkt.metadata_mut().udata_mut()[0] = worker as u8;
                    thread::yield_now();
                    assert_eq!(pkt.metadata().in_vif(), vif);
                    assert_eq!(pkt.metadata().udata()[0], worker as u8);
                }
            });
        }
    });

    assert_eq!(pool.in_use(), 0);
}

#[test]
fn accessor_matches_every_live_buffer() {
    let pool = PacketPool::new(PoolConfig::new("addresses", 8)).expect("pool");
    let pkts: Vec<_> = (0..8).map(|_| pool.alloc().expect("alloc")).collect();

    let mut records: Vec<usize> = pkts
        .iter()
        .map(|pkt| {
            let md = metadata_of(pkt.desc());
            assert_eq!(md.cast_const(), pkt.metadata() as *const _);
            md as usize
        })
        .collect();

    records.sort_unstable();
    for pair in records.windows(2) {
        assert!(pair[0] + dp_packet::PACKET_METADATA_SIZE <= pair[1]);
    }
}
