#![no_main]

use keysplit::{AdditiveScheme, SchemeKind, ShamirScheme, Share, ShareBundle};
use libfuzzer_sys::fuzz_target;

// Builds arbitrary bundles from the input and feeds them to the Shamir and
// additive reconstructors. Every malformed combination (index 0, duplicate
// or colliding indices, values above the modulus, mixed kinds or required
// counts) must come back as an error, never a panic.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let Ok(shamir) = ShamirScheme::new() else {
        return;
    };
    let Ok(additive) = AdditiveScheme::new() else {
        return;
    };

    let count = usize::from(data[0] % 16) + 1;
    let mut bundles = Vec::with_capacity(count);

    // 2 header bytes plus 8 words of (index, value) per bundle
    for chunk in data[1..].chunks_exact(2 + 8 * 8).take(count) {
        let kind = if chunk[0] & 1 == 0 {
            SchemeKind::Shamir
        } else {
            SchemeKind::Additive
        };
        let required = u32::from(chunk[1] % 20);
        let shares = std::array::from_fn(|w| {
            let word = &chunk[2 + 8 * w..2 + 8 * (w + 1)];
            Share {
                index: u32::from_le_bytes([word[0], word[1], word[2], word[3]]),
                value: u64::from(u32::from_le_bytes([word[4], word[5], word[6], word[7]])),
            }
        });
        bundles.push(ShareBundle {
            kind,
            required,
            shares,
        });
    }

    let _ = shamir.reconstruct(&bundles);
    let _ = additive.reconstruct(&bundles);

    // Same input with every word's index forced to the bundle's first index
    for bundle in bundles.iter_mut() {
        let index = bundle.index();
        for share in bundle.shares.iter_mut() {
            share.index = index;
        }
    }
    let _ = shamir.reconstruct(&bundles);
    let _ = additive.reconstruct(&bundles);
});
