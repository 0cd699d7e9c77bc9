use crate::error::FromValueError;
use crate::info::Typed;
use crate::value::{SerializationInfo, Value, ValueContext};

// -----------------------------------------------------------------------------
// DataContract

/// A type that converts to and from the dynamic [`Value`] graph.
///
/// Usually implemented with `#[derive(DataContract)]`. Members missing from
/// the input are filled with `Default::default()`, so derived classes need
/// `Default` on every member type.
///
/// # Examples
///
/// ```
/// use dc_contract::DataContract;
/// use dc_contract::value::{Value, ValueContext};
///
/// #[derive(DataContract, Default, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let value = Point { x: 1, y: 2 }.to_value(&mut ValueContext::new());
/// assert!(matches!(value, Value::Class(_)));
///
/// let back = Point::from_value(&value, &mut ValueContext::new()).unwrap();
/// assert_eq!(back, Point { x: 1, y: 2 });
/// ```
pub trait DataContract: Typed + Sized {
    fn to_value(&self, cx: &mut ValueContext) -> Value;

    fn from_value(value: &Value, cx: &mut ValueContext) -> Result<Self, FromValueError>;
}

// -----------------------------------------------------------------------------
// EnumContract

/// A C-like enum with integer bits, implemented by the derive.
pub trait EnumContract: DataContract + Copy {
    fn to_bits(self) -> i64;

    fn from_bits(bits: i64) -> Option<Self>;
}

// -----------------------------------------------------------------------------
// SerializableData

/// Hand-written serialization over an ordered name/value list.
///
/// Mark the type with `#[data_contract(custom)]` and implement this trait,
/// the derive wires it into [`DataContract`]. Entries are written in the
/// order they were added.
///
/// Each entry is an `anyType` slot: builtin values are always accepted,
/// other types must be known types of the serializer.
///
/// # Examples
///
/// ```
/// use dc_contract::{DataContract, FromValueError, SerializableData};
/// use dc_contract::value::{SerializationInfo, ValueContext};
///
/// #[derive(DataContract, Debug, PartialEq)]
/// #[data_contract(custom)]
/// struct Celsius(f64);
///
/// impl SerializableData for Celsius {
///     fn get_object_data(&self, info: &mut SerializationInfo, cx: &mut ValueContext) {
///         info.add_value("degrees", &self.0, cx);
///     }
///
///     fn from_object_data(
///         info: &SerializationInfo,
///         cx: &mut ValueContext,
///     ) -> Result<Self, FromValueError> {
///         Ok(Celsius(info.get_value("degrees", cx)?))
///     }
/// }
///
/// let value = Celsius(21.5).to_value(&mut ValueContext::new());
/// assert_eq!(Celsius::from_value(&value, &mut ValueContext::new()), Ok(Celsius(21.5)));
/// ```
pub trait SerializableData: Sized {
    fn get_object_data(&self, info: &mut SerializationInfo, cx: &mut ValueContext);

    fn from_object_data(
        info: &SerializationInfo,
        cx: &mut ValueContext,
    ) -> Result<Self, FromValueError>;
}
