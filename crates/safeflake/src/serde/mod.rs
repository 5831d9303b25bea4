use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FlakeId;

impl Serialize for FlakeId {
    /// Serializes as the packed integer.
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

impl<'de> Deserialize<'de> for FlakeId {
    /// Deserializes from the packed integer, rejecting values above
    /// [`FlakeId::MAX_SAFE_INTEGER`].
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        Self::try_from(raw).map_err(|raw| {
            serde::de::Error::custom(format_args!(
                "{raw} exceeds the maximum safe integer {}",
                Self::MAX_SAFE_INTEGER
            ))
        })
    }
}
