use num::ToPrimitive;

/// Pixel types with a reserved value marking missing data.
///
/// Floats use NaN, unsigned integers their maximum and signed integers their minimum value.
pub trait Nodata: ToPrimitive + PartialEq + Sized + Copy {
    const NODATA: Self;

    fn is_nodata(self) -> bool {
        self == Self::NODATA
    }

    /// Replaces a foreign nodata value with [`Nodata::NODATA`]
    fn init_nodata(&mut self, nodata: Self) {
        if *self == nodata {
            *self = Self::NODATA;
        }
    }

    fn has_nan() -> bool {
        false
    }
}

macro_rules! impl_nodata {
    ( $($t:ident => $nodata:ident),* ) => {
        $(impl Nodata for $t {
            const NODATA: $t = $t::$nodata;
        })*
    };
}

macro_rules! impl_nodata_float {
    ( $($t:ident),* ) => {
        $(impl Nodata for $t {
            const NODATA: $t = $t::NAN;

            fn is_nodata(self) -> bool {
                self.is_nan()
            }

            fn has_nan() -> bool {
                true
            }
        })*
    };
}

impl_nodata!(u8 => MAX, u16 => MAX, u32 => MAX, i8 => MIN, i16 => MIN, i32 => MIN, i64 => MIN);
impl_nodata_float!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodata_values() {
        assert!(u8::MAX.is_nodata());
        assert!(!0u8.is_nodata());
        assert!(i16::MIN.is_nodata());
        assert!(f64::NAN.is_nodata());
        assert!(!f64::INFINITY.is_nodata());
        assert!(f32::has_nan());
        assert!(!i32::has_nan());
    }

    #[test]
    fn foreign_nodata() {
        let mut val = -9999.0f32;
        val.init_nodata(-9999.0);
        assert!(val.is_nodata());

        let mut val = 0u8;
        val.init_nodata(0);
        assert_eq!(val, u8::MAX);

        let mut val = 7i32;
        val.init_nodata(0);
        assert_eq!(val, 7);
    }
}
