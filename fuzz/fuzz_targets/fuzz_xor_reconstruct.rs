#![no_main]

use keysplit::{AtomicShare, ReplicatedScheme, ReplicatedShares, TwoOfNRow, TwoOutOfNScheme};
use libfuzzer_sys::fuzz_target;

// Replicated parties and 2-out-of-n rows built from raw input must never
// panic on reconstruction, whatever their slots, counts and lengths.
fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let Ok(replicated) = ReplicatedScheme::new() else {
        return;
    };

    let threshold = u32::from(data[0] % 8);
    let parties = u32::from(data[1] % 8);
    let mut input = data[2..].chunks_exact(5);

    let mut holders = Vec::new();
    for index in 0..u32::from(data[2] % 6) + 1 {
        let words = std::array::from_fn(|_| {
            let mut held = Vec::new();
            for chunk in input.by_ref().take(3) {
                held.push(AtomicShare {
                    slot: u32::from(chunk[0] % 40),
                    value: u32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]),
                });
            }
            held
        });
        holders.push(ReplicatedShares {
            index: index % 5,
            threshold,
            parties,
            words,
        });
    }
    let _ = replicated.reconstruct(&holders);

    // Split the rest of the input into two rows with uneven columns
    let rest = &data[2..];
    let columns = usize::from(data[3] % 4);
    let width = usize::from(data[4] % 8);
    let row = |offset: usize, index: u32| TwoOfNRow {
        index,
        columns: rest[offset.min(rest.len())..]
            .chunks(width.max(1))
            .take(columns)
            .map(<[u8]>::to_vec)
            .collect(),
    };
    let _ = TwoOutOfNScheme::reconstruct(&row(0, 0), &row(1, 1));
});
