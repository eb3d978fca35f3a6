//! Element types a compressed hopping matrix can hold
//!
//! Converted matrices carry family ids (`u32`); consumers typically map
//! them to hopping energies of another element type.

use crate::format::DataType;

/// Trait for types that can be stored as matrix values
///
/// All element types are `Copy` and have a fixed on-disk [`DataType`].
pub trait MatrixElement: Copy + Clone + PartialEq + Sized {
    /// On-disk data type tag
    fn data_type() -> DataType;

    /// Size in bytes of one element
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Lossy conversion from f64
    fn from_f64(value: f64) -> Self;

    /// Lossy conversion to f64
    fn to_f64(self) -> f64;
}

macro_rules! impl_matrix_element {
    ($type:ty, $variant:ident) => {
        impl MatrixElement for $type {
            fn data_type() -> DataType {
                DataType::$variant
            }

            fn from_f64(value: f64) -> Self {
                value as $type
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_matrix_element!(f32, F32);
impl_matrix_element!(f64, F64);
impl_matrix_element!(i32, I32);
impl_matrix_element!(i64, I64);
impl_matrix_element!(u32, U32);
impl_matrix_element!(u64, U64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_types() {
        assert_eq!(u32::data_type(), DataType::U32);
        assert_eq!(f64::data_type(), DataType::F64);
        assert_eq!(u32::size_bytes(), 4);
        assert_eq!(<u32 as MatrixElement>::from_f64(3.0), 3);
    }
}
