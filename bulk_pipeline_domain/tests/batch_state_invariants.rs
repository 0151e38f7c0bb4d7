// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Property tests for `BatchState`: arbitrary sequences of per-chunk
//! outcomes must never violate `check_invariants` (§8), and completing the
//! same set of chunks in any order must converge on the same status.

use bulk_pipeline_domain::{BatchId, BatchState, ErrorCode, FailureRecord};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Success,
    Failure,
    Skipped,
    Complete(u32),
}

fn op_strategy(total_chunks: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Success),
        Just(Op::Failure),
        Just(Op::Skipped),
        (0..total_chunks).prop_map(Op::Complete),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_any_sequence_of_outcomes(
        total_chunks in 1u32..6,
        total_records in 0u64..50,
        ops in prop::collection::vec(op_strategy(4), 0..40),
    ) {
        let mut state = BatchState::new(
            BatchId::new("BATCH-1-aaaaaaaa").unwrap(),
            total_chunks,
            total_records,
            "system",
            "file.csv",
        );

        for op in ops {
            match op {
                Op::Success => state.record_success(),
                Op::Failure => state.record_failure(FailureRecord::new("TKT-X", ErrorCode::DatabaseError, "boom")),
                Op::Skipped => state.record_skipped(),
                Op::Complete(idx) => {
                    if idx < total_chunks {
                        state.complete_chunk(idx);
                    }
                }
            }
            prop_assert!(state.check_invariants().is_ok());
        }
    }

    #[test]
    fn completing_the_same_chunks_in_any_order_converges_on_the_same_status(
        total_chunks in 1u32..6,
    ) {
        let build = |order: Vec<u32>| {
            let mut s = BatchState::new(
                BatchId::new("BATCH-2-bbbbbbbb").unwrap(),
                total_chunks,
                total_chunks as u64,
                "system",
                "file.csv",
            );
            for _ in 0..total_chunks {
                s.record_success();
            }
            for idx in order {
                s.complete_chunk(idx);
            }
            s
        };

        let forward: Vec<u32> = (0..total_chunks).collect();
        let reverse: Vec<u32> = (0..total_chunks).rev().collect();

        let a = build(forward);
        let b = build(reverse);
        prop_assert_eq!(a.status(), b.status());
        prop_assert_eq!(a.completed_chunks(), b.completed_chunks());
        prop_assert!(a.check_invariants().is_ok());
    }
}
