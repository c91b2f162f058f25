use crate::conversion::domain::image_output::EncodeError;

/// A standalone, stateless transformation between two item types.
pub trait Conversion: Send {
    type Input;
    type Output;

    fn convert(&self, input: Self::Input) -> Result<Self::Output, EncodeError>;
}
