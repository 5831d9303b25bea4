use crate::{ConfigError, FlakeId};

/// Environment variable read by [`GeneratorConfig::from_env`] for the epoch.
pub const EPOCH_ENV: &str = "SAFEFLAKE_EPOCH";

/// Environment variable read by [`GeneratorConfig::from_env`] for the worker
/// ID.
pub const WORKER_ID_ENV: &str = "SAFEFLAKE_WORKER_ID";

/// Caller-supplied generator settings, validated into a [`ValidConfig`] when a
/// generator is built.
///
/// - `epoch` is required and counts milliseconds since the Unix epoch. Zero is
///   treated as missing.
/// - `worker_id` is optional and defaults to `0`. It must lie in `0..=9`
///   unless set through [`GeneratorConfig::with_wrapped_worker_id`].
///
/// With the `serde` feature this deserializes from `{"epoch": ..,
/// "workerId": ..}`. A `workerId` that is not an integer fails to
/// deserialize.
///
/// # Example
///
/// ```
/// use safeflake::GeneratorConfig;
///
/// let config = GeneratorConfig::new(1_583_843_696_123).with_worker_id(6);
/// let valid = config.validate().unwrap();
/// assert_eq!(valid.worker_id(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    epoch: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    worker_id: Option<i64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    wrap_worker_id: bool,
}

impl GeneratorConfig {
    /// Creates a configuration for the given epoch (ms since the Unix epoch)
    /// and the default worker ID `0`.
    pub const fn new(epoch: u64) -> Self {
        Self {
            epoch,
            worker_id: None,
            wrap_worker_id: false,
        }
    }

    /// Sets the worker ID. Values outside `0..=9` fail validation.
    #[must_use]
    pub const fn with_worker_id(mut self, worker_id: i64) -> Self {
        self.worker_id = Some(worker_id);
        self.wrap_worker_id = false;
        self
    }

    /// Sets the worker ID, folding any integer into `0..=9` with
    /// `abs(worker_id) % 10` instead of rejecting it.
    ///
    /// Distinct inputs can fold onto the same worker ID (`3`, `13` and `-3` all
    /// become `3`), so only use this when worker IDs are already known to be
    /// unique after folding.
    #[must_use]
    pub const fn with_wrapped_worker_id(mut self, worker_id: i64) -> Self {
        self.worker_id = Some(worker_id);
        self.wrap_worker_id = true;
        self
    }

    /// Reads [`EPOCH_ENV`] and [`WORKER_ID_ENV`] from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEpoch`] if the epoch is unset
    /// - [`ConfigError::InvalidEpoch`] if it is not a whole number
    /// - [`ConfigError::InvalidWorkerId`] if the worker ID is set but not an
    ///   integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], but resolves variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let epoch = lookup(EPOCH_ENV).ok_or(ConfigError::MissingEpoch)?;
        let epoch = parse_epoch(&epoch)?;

        let config = Self::new(epoch);
        match lookup(WORKER_ID_ENV) {
            Some(raw) => Ok(config.with_worker_id(parse_worker_id(&raw)?)),
            None => Ok(config),
        }
    }

    /// Returns the raw epoch.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the raw worker ID, if one was set.
    pub const fn worker_id(&self) -> Option<i64> {
        self.worker_id
    }

    /// Checks the configuration and normalizes the worker ID.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEpoch`] if the epoch is zero
    /// - [`ConfigError::WorkerIdOutOfRange`] if the worker ID is outside
    ///   `0..=9` and wrapping was not requested
    pub fn validate(&self) -> Result<ValidConfig, ConfigError> {
        if self.epoch == 0 {
            return Err(ConfigError::MissingEpoch);
        }

        let worker_id = match self.worker_id {
            None => 0,
            Some(raw) if self.wrap_worker_id => {
                // `unsigned_abs` keeps `i64::MIN` from overflowing
                (raw.unsigned_abs() % (FlakeId::MAX_WORKER_ID as u64 + 1)) as u8
            }
            Some(raw) => u8::try_from(raw)
                .ok()
                .filter(|id| *id <= FlakeId::MAX_WORKER_ID)
                .ok_or(ConfigError::WorkerIdOutOfRange { worker_id: raw })?,
        };

        ValidConfig::new(self.epoch, worker_id)
    }
}

impl TryFrom<GeneratorConfig> for ValidConfig {
    type Error = ConfigError;

    fn try_from(config: GeneratorConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

/// A checked configuration: a non-zero epoch and a worker ID in `0..=9`.
///
/// Immutable once built. Every generator holds exactly one.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValidConfig {
    epoch: u64,
    worker_id: u8,
}

impl ValidConfig {
    /// Builds a config from already-typed parts.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEpoch`] if `epoch` is zero
    /// - [`ConfigError::WorkerIdOutOfRange`] if `worker_id > 9`
    pub const fn new(epoch: u64, worker_id: u8) -> Result<Self, ConfigError> {
        if epoch == 0 {
            return Err(ConfigError::MissingEpoch);
        }
        if worker_id > FlakeId::MAX_WORKER_ID {
            return Err(ConfigError::WorkerIdOutOfRange {
                worker_id: worker_id as i64,
            });
        }
        Ok(Self { epoch, worker_id })
    }

    /// Epoch in milliseconds since the Unix epoch.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Worker ID in `0..=9`.
    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }
}

fn parse_epoch(raw: &str) -> Result<u64, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingEpoch);
    }
    trimmed.parse().map_err(|_| ConfigError::InvalidEpoch {
        value: raw.to_string(),
    })
}

fn parse_worker_id(raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidWorkerId {
        value: raw.to_string(),
    })
}
