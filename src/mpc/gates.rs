// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Non-linear gates built from [`GateEvaluator::multiply`].

use super::{GateEvaluator, Shared};
use crate::{
    errors::Result,
    gf256::{self, AFFINE_CONSTANT, INVERSE_EXPONENT},
};

/// The message a party sends in a multiplication gate.
///
/// A party holding `(x_own, y_own)` and seeing its neighbour's
/// `(x_next, y_next)` outputs its share of the product. The two random bytes
/// mask the cross terms; each one appears in exactly two outputs, so the
/// masks cancel when the three outputs are XORed together.
#[cfg_attr(feature = "flame_it", flame("gates"))]
pub(crate) fn product_share(
    (x_own, y_own): (u8, u8),
    (x_next, y_next): (u8, u8),
    (r_own, r_next): (u8, u8),
) -> u8 {
    gf256::mul(x_own, y_own)
        ^ gf256::mul(x_next, y_own)
        ^ gf256::mul(x_own, y_next)
        ^ r_own
        ^ r_next
}

/// Shared inversion via the same square-and-multiply ladder as
/// [`gf256::inverse`]: 8 squarings interleaved with 7 multiplications, 15
/// gates in total.
pub(crate) fn invert<const N: usize, E: GateEvaluator<N>>(
    evaluator: &mut E,
    x: Shared<N>,
) -> Result<Shared<N>> {
    let mut base = x;
    let mut exponent = INVERSE_EXPONENT;
    let mut acc = evaluator.constant(1);
    while exponent > 0 {
        if exponent & 1 == 1 {
            acc = evaluator.multiply(base, acc)?;
        }
        exponent >>= 1;
        base = evaluator.multiply(base, base)?;
    }
    Ok(acc)
}

/// Shared S-box: inversion followed by the affine map, whose linear part is
/// applied to every share and whose constant goes to the constant holder.
pub(crate) fn sbox<const N: usize, E: GateEvaluator<N>>(
    evaluator: &mut E,
    x: Shared<N>,
) -> Result<Shared<N>> {
    let inverted = invert(evaluator, x)?;
    Ok(inverted.map_linear(gf256::affine_linear) ^ evaluator.constant(AFFINE_CONSTANT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mpc::{Shared, Simulation},
        rng::RoundSeed,
        utils::testing::init_testing,
    };
    use rand::Rng;

    fn reconstruct(x: Shared<3>) -> u8 {
        x.0.iter().fold(0, |acc, s| acc ^ s)
    }

    fn random_sharing<R: Rng>(rng: &mut R) -> Shared<3> {
        Shared([rng.gen(), rng.gen(), rng.gen()])
    }

    fn simulation<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Simulation {
        Simulation::new(&[
            RoundSeed::random(rng),
            RoundSeed::random(rng),
            RoundSeed::random(rng),
        ])
    }

    #[test]
    fn multiply_reconstructs_product() -> Result<()> {
        let mut rng = init_testing();
        let mut sim = simulation(&mut rng);
        for _ in 0..500 {
            let x = random_sharing(&mut rng);
            let y = random_sharing(&mut rng);
            let z = sim.multiply(x, y)?;
            assert_eq!(
                reconstruct(z),
                gf256::mul(reconstruct(x), reconstruct(y))
            );
        }
        Ok(())
    }

    #[test]
    fn multiply_appends_one_entry_per_party() -> Result<()> {
        let mut rng = init_testing();
        let mut sim = simulation(&mut rng);
        sim.multiply(random_sharing(&mut rng), random_sharing(&mut rng))?;
        sim.multiply(random_sharing(&mut rng), random_sharing(&mut rng))?;
        for view in sim.into_views() {
            assert_eq!(view.len(), 2);
            assert!(view.entries().all(|entry| entry.len() == 1));
        }
        Ok(())
    }

    #[test]
    fn invert_matches_field_inverse() -> Result<()> {
        let mut rng = init_testing();
        let mut sim = simulation(&mut rng);
        for a in 0..=255u8 {
            let mut x = random_sharing(&mut rng);
            x.0[2] ^= reconstruct(x) ^ a;
            assert_eq!(reconstruct(invert(&mut sim, x)?), gf256::inverse(a));
        }
        for view in sim.into_views() {
            assert_eq!(view.len(), 256 * 15);
        }
        Ok(())
    }

    #[test]
    fn sbox_matches_reference_sbox() -> Result<()> {
        let mut rng = init_testing();
        let mut sim = simulation(&mut rng);
        for a in 0..=255u8 {
            let mut x = random_sharing(&mut rng);
            x.0[0] ^= reconstruct(x) ^ a;
            assert_eq!(reconstruct(sbox(&mut sim, x)?), gf256::sbox(a));
        }
        Ok(())
    }

    #[test]
    fn product_share_cancels_masks() {
        let x = [0x12, 0x34, 0x56];
        let y = [0x9a, 0xbc, 0xde];
        let r = [0x01, 0x80, 0xff];
        let z: u8 = (0..3)
            .map(|i| {
                let n = (i + 1) % 3;
                product_share((x[i], y[i]), (x[n], y[n]), (r[i], r[n]))
            })
            .fold(0, |acc, s| acc ^ s);
        assert_eq!(z, gf256::mul(0x12 ^ 0x34 ^ 0x56, 0x9a ^ 0xbc ^ 0xde));
    }
}
