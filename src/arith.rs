//! In-place arithmetic capabilities for `add` / `sub`.
//!
//! Which value types support accumulation is decided at compile time: a
//! `SafeMap<K, V>` only exposes [`SafeMap::add`](crate::map::SafeMap::add)
//! when `V: Accumulate` and [`SafeMap::sub`](crate::map::SafeMap::sub) when
//! `V: Deduct`.
//!
//! | Type                               | `Accumulate`        | `Deduct`       |
//! |------------------------------------|---------------------|----------------|
//! | `i8`..`i128`, `isize`              | wrapping add        | wrapping sub   |
//! | `u8`..`u128`, `usize`              | wrapping add        | wrapping sub   |
//! | `f32`, `f64`                       | IEEE-754 add        | IEEE-754 sub   |
//! | `String`                           | concatenation       | not provided   |
//!
//! Integer arithmetic wraps on overflow instead of panicking, so an
//! accumulator that runs past its range rolls over in two's complement.
//!
//! ## Example
//!
//! ```
//! use safemap::arith::{Accumulate, Deduct};
//!
//! let mut hits = 250u8;
//! hits.accumulate(10);
//! assert_eq!(hits, 4);
//!
//! let mut label = String::from("user:");
//! label.accumulate("42".to_string());
//! assert_eq!(label, "user:42");
//!
//! let mut balance = 10.5f64;
//! balance.deduct(0.5);
//! assert_eq!(balance, 10.0);
//! ```

/// Values that can absorb another value of the same type in place.
pub trait Accumulate {
    fn accumulate(&mut self, rhs: Self);
}

/// Values that can have another value of the same type taken away in place.
pub trait Deduct {
    fn deduct(&mut self, rhs: Self);
}

macro_rules! impl_wrapping {
    ($($t:ty),* $(,)?) => {
        $(
            impl Accumulate for $t {
                #[inline]
                fn accumulate(&mut self, rhs: Self) {
                    *self = self.wrapping_add(rhs);
                }
            }

            impl Deduct for $t {
                #[inline]
                fn deduct(&mut self, rhs: Self) {
                    *self = self.wrapping_sub(rhs);
                }
            }
        )*
    };
}

macro_rules! impl_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl Accumulate for $t {
                #[inline]
                fn accumulate(&mut self, rhs: Self) {
                    *self += rhs;
                }
            }

            impl Deduct for $t {
                #[inline]
                fn deduct(&mut self, rhs: Self) {
                    *self -= rhs;
                }
            }
        )*
    };
}

impl_wrapping!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_float!(f32, f64);

impl Accumulate for String {
    #[inline]
    fn accumulate(&mut self, rhs: Self) {
        self.push_str(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_integers_add_and_sub() {
        let mut v = 10i32;
        v.accumulate(5);
        assert_eq!(v, 15);
        v.deduct(20);
        assert_eq!(v, -5);

        let mut w = -3i64;
        w.deduct(-3);
        assert_eq!(w, 0);
    }

    #[test]
    fn unsigned_underflow_wraps() {
        let mut v = 0u32;
        v.deduct(1);
        assert_eq!(v, u32::MAX);
        v.accumulate(2);
        assert_eq!(v, 1);
    }

    #[test]
    fn signed_overflow_wraps() {
        let mut v = i8::MAX;
        v.accumulate(1);
        assert_eq!(v, i8::MIN);
    }

    #[test]
    fn floats_follow_ieee() {
        let mut v = 1.5f32;
        v.accumulate(2.25);
        assert_eq!(v, 3.75);
        v.deduct(0.75);
        assert_eq!(v, 3.0);

        let mut nan = f64::NAN;
        nan.accumulate(1.0);
        assert!(nan.is_nan());
    }

    #[test]
    fn strings_concatenate() {
        let mut s = String::new();
        s.accumulate("ab".to_string());
        s.accumulate("cd".to_string());
        assert_eq!(s, "abcd");
    }

    #[test]
    fn every_width_is_covered() {
        fn both<T: Accumulate + Deduct>() {}
        both::<i8>();
        both::<i16>();
        both::<i128>();
        both::<isize>();
        both::<u8>();
        both::<u16>();
        both::<u64>();
        both::<u128>();
        both::<usize>();
        both::<f64>();

        fn add_only<T: Accumulate>() {}
        add_only::<String>();
    }
}
