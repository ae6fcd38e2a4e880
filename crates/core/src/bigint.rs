//! A small hand-rolled arbitrary-precision signed integer.
//!
//! The numeric tower's interesting algorithm is the promotion/demotion rule
//! in [`crate::numeric`], not bignum arithmetic itself, so this stays a
//! compact sign-magnitude implementation over base-2^32 limbs rather than
//! pulling in an external bignum crate (see DESIGN.md).

use std::cmp::Ordering;
use std::fmt;

/// Sign-magnitude arbitrary-precision integer. `mag` is little-endian
/// (least-significant limb first) with no trailing zero limbs; zero is
/// represented as an empty `mag` with `negative = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigInt {
    negative: bool,
    mag: Vec<u32>,
}

impl BigInt {
    fn normalize(mut mag: Vec<u32>, negative: bool) -> Self {
        while mag.last() == Some(&0) {
            mag.pop();
        }
        let negative = if mag.is_empty() { false } else { negative };
        BigInt { negative, mag }
    }

    pub fn zero() -> Self {
        BigInt {
            negative: false,
            mag: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mag.is_empty()
    }

    pub fn from_i64(n: i64) -> Self {
        let negative = n < 0;
        // i64::MIN negated overflows i64, so widen through i128 first.
        let mut abs = (n as i128).unsigned_abs() as u128;
        let mut mag = Vec::new();
        while abs > 0 {
            mag.push((abs & 0xFFFF_FFFF) as u32);
            abs >>= 32;
        }
        BigInt::normalize(mag, negative)
    }

    /// Parse a decimal literal (optionally `-`-prefixed). Returns `None` if
    /// `s` is empty or contains a non-digit.
    pub fn parse(s: &str) -> Option<Self> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut value = BigInt::zero();
        let ten = BigInt::from_i64(10);
        for ch in digits.chars() {
            let digit = BigInt::from_i64((ch as u8 - b'0') as i64);
            value = value.mul(&ten).add(&digit);
        }
        if negative && !value.is_zero() {
            value.negative = true;
        }
        Some(value)
    }

    /// Demote to `i32` if this value fits, for numeric-tower normalization.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|n| i32::try_from(n).ok())
    }

    fn to_i64(&self) -> Option<i64> {
        if self.mag.len() > 2 {
            return None;
        }
        let mut value: u128 = 0;
        for (i, limb) in self.mag.iter().enumerate() {
            value |= (*limb as u128) << (32 * i);
        }
        if self.negative {
            if value > (i64::MAX as u128) + 1 {
                None
            } else {
                Some(-(value as i128) as i64)
            }
        } else if value > i64::MAX as u128 {
            None
        } else {
            Some(value as i64)
        }
    }

    fn cmp_mag(a: &[u32], b: &[u32]) -> Ordering {
        if a.len() != b.len() {
            return a.len().cmp(&b.len());
        }
        for i in (0..a.len()).rev() {
            if a[i] != b[i] {
                return a[i].cmp(&b[i]);
            }
        }
        Ordering::Equal
    }

    fn add_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
        let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
        let mut carry = 0u64;
        for i in 0..a.len().max(b.len()) {
            let x = *a.get(i).unwrap_or(&0) as u64;
            let y = *b.get(i).unwrap_or(&0) as u64;
            let sum = x + y + carry;
            out.push((sum & 0xFFFF_FFFF) as u32);
            carry = sum >> 32;
        }
        if carry > 0 {
            out.push(carry as u32);
        }
        out
    }

    /// Subtract `b` from `a`, requiring `a >= b` in magnitude.
    fn sub_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
        let mut out = Vec::with_capacity(a.len());
        let mut borrow = 0i64;
        for i in 0..a.len() {
            let x = a[i] as i64;
            let y = *b.get(i).unwrap_or(&0) as i64;
            let mut diff = x - y - borrow;
            if diff < 0 {
                diff += 1 << 32;
                borrow = 1;
            } else {
                borrow = 0;
            }
            out.push(diff as u32);
        }
        out
    }

    pub fn add(&self, other: &BigInt) -> BigInt {
        if self.negative == other.negative {
            BigInt::normalize(Self::add_mag(&self.mag, &other.mag), self.negative)
        } else {
            match Self::cmp_mag(&self.mag, &other.mag) {
                Ordering::Equal => BigInt::zero(),
                Ordering::Greater => {
                    BigInt::normalize(Self::sub_mag(&self.mag, &other.mag), self.negative)
                }
                Ordering::Less => {
                    BigInt::normalize(Self::sub_mag(&other.mag, &self.mag), other.negative)
                }
            }
        }
    }

    pub fn sub(&self, other: &BigInt) -> BigInt {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> BigInt {
        if self.is_zero() {
            self.clone()
        } else {
            BigInt {
                negative: !self.negative,
                mag: self.mag.clone(),
            }
        }
    }

    pub fn mul(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let mut out = vec![0u32; self.mag.len() + other.mag.len()];
        for (i, &a) in self.mag.iter().enumerate() {
            let mut carry = 0u64;
            for (j, &b) in other.mag.iter().enumerate() {
                let idx = i + j;
                let prod = a as u64 * b as u64 + out[idx] as u64 + carry;
                out[idx] = (prod & 0xFFFF_FFFF) as u32;
                carry = prod >> 32;
            }
            let mut idx = i + other.mag.len();
            while carry > 0 {
                let sum = out[idx] as u64 + carry;
                out[idx] = (sum & 0xFFFF_FFFF) as u32;
                carry = sum >> 32;
                idx += 1;
            }
        }
        BigInt::normalize(out, self.negative != other.negative)
    }

    pub fn compare(&self, other: &BigInt) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => Self::cmp_mag(&self.mag, &other.mag),
            (true, true) => Self::cmp_mag(&other.mag, &self.mag),
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        // Repeatedly divide the magnitude by 10^9, emitting 9-digit chunks.
        let mut limbs = self.mag.clone();
        let mut chunks = Vec::new();
        while !limbs.is_empty() {
            let mut remainder: u64 = 0;
            for limb in limbs.iter_mut().rev() {
                let acc = (remainder << 32) | *limb as u64;
                *limb = (acc / 1_000_000_000) as u32;
                remainder = acc % 1_000_000_000;
            }
            while limbs.last() == Some(&0) {
                limbs.pop();
            }
            chunks.push(remainder as u32);
        }
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "{}", chunks.pop().unwrap())?;
        for chunk in chunks.into_iter().rev() {
            write!(f, "{:09}", chunk)?;
        }
        Ok(())
    }
}
