/// Number of decimal digits reserved for the index in a standby directory name.
pub const INDEX_WIDTH: usize = 2;

/// Number of distinct indexes the fixed-width field can express (`01`..`99`).
///
/// This is a hard limit of the naming scheme: a single date can never own more
/// than this many standby directories.
pub const INDEX_CAPACITY: u8 = 99;

/// Errors that can occur when creating validated index types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The 0-based index does not fit the two-digit, 1-based display field
    #[error("Index {0} exceeds the {cap} directories a date can hold", cap = INDEX_CAPACITY)]
    OutOfRange(u8),

    /// The 1-based display value was zero
    #[error("Display index must start at 1")]
    Zero,
}

/// A 0-based standby directory index that is guaranteed to render in two digits.
///
/// Internally the index starts at zero; on disk it is displayed 1-based and
/// zero-padded (`0` becomes `01`, `98` becomes `99`). Once constructed the value
/// is always below [`INDEX_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StandbyIndex(u8);

impl StandbyIndex {
    /// The first index of every date.
    pub const FIRST: Self = Self(0);

    /// Creates a new `StandbyIndex` from a 0-based value.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::OutOfRange`] when `index + 1` would need more than
    /// [`INDEX_WIDTH`] digits.
    pub fn new(index: u8) -> Result<Self, IndexError> {
        if index >= INDEX_CAPACITY {
            return Err(IndexError::OutOfRange(index));
        }
        Ok(Self(index))
    }

    /// Creates a `StandbyIndex` from the 1-based value found in a directory name.
    pub fn from_one_based(display: u8) -> Result<Self, IndexError> {
        match display {
            0 => Err(IndexError::Zero),
            n => Self::new(n - 1),
        }
    }

    /// Returns the 0-based index.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the 1-based value used in directory names.
    pub fn one_based(self) -> u8 {
        self.0 + 1
    }

    /// Returns the following index, or `None` once the field is exhausted.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }
}

impl std::fmt::Display for StandbyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$}", self.one_based(), width = INDEX_WIDTH)
    }
}

impl TryFrom<u8> for StandbyIndex {
    type Error = IndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl serde::Serialize for StandbyIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for StandbyIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        StandbyIndex::new(value).map_err(serde::de::Error::custom)
    }
}
