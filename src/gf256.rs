// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arithmetic over GF(2^8) ~= GF(2)\[x\] / (x^8 + x^4 + x^3 + x + 1).

/// The AES reduction polynomial x^8 + x^4 + x^3 + x + 1.
const REDUCTION_POLYNOMIAL: u16 = 0x11B;

/// Exponent used for inversion: a^254 = a^-1 for a != 0.
pub(crate) const INVERSE_EXPONENT: u8 = 254;

/// The constant term of the Rijndael affine transform.
pub(crate) const AFFINE_CONSTANT: u8 = 0x63;

/// Carry-less multiplication reduced modulo [`REDUCTION_POLYNOMIAL`].
#[cfg_attr(feature = "flame_it", flame("gf256"))]
pub fn mul(a: u8, b: u8) -> u8 {
    let mut a = a as u16;
    let mut b = b;
    let mut c = 0u16;
    for _ in 0..8 {
        if b & 1 == 1 {
            c ^= a;
        }
        b >>= 1;
        a <<= 1;
        if a > 0xFF {
            a ^= REDUCTION_POLYNOMIAL;
        }
    }
    c as u8
}

/// Computes `a^254`, which is the multiplicative inverse of `a` when `a != 0`
/// and `0` otherwise.
///
/// The ladder runs exactly 8 iterations, squaring the base every time and
/// multiplying it into the accumulator on the 7 iterations where the low bit
/// of the exponent is set. [`crate::mpc::invert`] spends one multiplication
/// gate per step in the same order.
pub fn inverse(a: u8) -> u8 {
    let mut base = a;
    let mut exponent = INVERSE_EXPONENT;
    let mut acc = 1;
    while exponent > 0 {
        if exponent & 1 == 1 {
            acc = mul(acc, base);
        }
        exponent >>= 1;
        base = mul(base, base);
    }
    acc
}

/// The GF(2)-linear part of the Rijndael affine transform.
pub(crate) fn affine_linear(x: u8) -> u8 {
    x ^ x.rotate_left(1) ^ x.rotate_left(2) ^ x.rotate_left(3) ^ x.rotate_left(4)
}

/// The Rijndael affine transform.
pub fn affine(x: u8) -> u8 {
    affine_linear(x) ^ AFFINE_CONSTANT
}

/// The Rijndael S-box.
pub fn sbox(a: u8) -> u8 {
    affine(inverse(a))
}
