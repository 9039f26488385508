use thiserror::Error;

/// The balance factor of a scapegoat tree, a value in the open interval `(0.5, 1)`.
///
/// A node is considered weight-balanced when neither of its subtrees holds more than `alpha`
/// of the node's weight. Smaller values keep the tree closer to perfectly balanced at the
/// cost of more frequent rebuilds; values near `1` rebuild rarely and tolerate deep paths.
///
/// # Examples
///
/// ```
/// use sgtree::{Alpha, SGTreeMap};
///
/// let alpha = Alpha::new(0.75).unwrap();
/// let mut map = SGTreeMap::with_alpha(alpha);
/// map.insert(1, "a");
/// assert_eq!(map.alpha(), alpha);
///
/// assert!(Alpha::new(0.5).is_err());
/// assert_eq!(Alpha::default(), Alpha::DEFAULT);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Alpha(f64);

/// Returned when constructing an [`Alpha`] from an unusable value.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum AlphaError {
    /// The value is not strictly between `0.5` and `1` (NaN included).
    #[error("alpha must lie strictly between 0.5 and 1, got {0}")]
    OutOfRange(f64),
}

impl Alpha {
    /// The balance factor used by [`SGTreeMap::new`](crate::SGTreeMap::new).
    pub const DEFAULT: Self = Self(0.57);

    /// Validates and wraps a balance factor.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::OutOfRange`] unless `0.5 < alpha < 1`.
    pub fn new(alpha: f64) -> Result<Self, AlphaError> {
        if alpha > 0.5 && alpha < 1.0 {
            Ok(Self(alpha))
        } else {
            Err(AlphaError::OutOfRange(alpha))
        }
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Returns `true` if an entry `depth` edges below the root sits deeper than
    /// `floor(log_{1/alpha}(n))`, so an insertion must look for a scapegoat.
    ///
    /// Equivalent to `(1/alpha)^depth > n`. The power is built by repeated multiplication,
    /// which needs no `std` float functions, and stops as soon as it passes `n`: the cost is
    /// O(`depth`) whatever `alpha` is.
    pub(crate) fn exceeds_height_limit(self, depth: usize, n: usize) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        let base = 1.0 / self.0;
        let mut power = 1.0;
        for _ in 0..depth {
            power *= base;
            if power > n {
                return true;
            }
        }
        false
    }

    /// `floor(log_{1/alpha}(n))`: the largest `h` with `(1/alpha)^h <= n`, `0` for `n <= 1`.
    #[cfg(test)]
    pub(crate) fn height_limit(self, n: usize) -> usize {
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        let base = 1.0 / self.0;
        let mut limit = 0;
        let mut power = base;
        while power <= n {
            limit += 1;
            power *= base;
        }
        limit
    }

    /// Returns `true` if a child of weight `part` stays within `alpha` of a parent of weight
    /// `whole`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn admits(self, part: usize, whole: usize) -> bool {
        part as f64 <= self.0 * whole as f64
    }

    /// Returns `true` once removals have shrunk the tree below `alpha` of its high-water mark.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn falls_short(self, len: usize, max_len: usize) -> bool {
        (len as f64) < self.0 * max_len as f64
    }
}

impl Default for Alpha {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Alpha {
    type Error = AlphaError;

    fn try_from(alpha: f64) -> Result<Self, Self::Error> {
        Self::new(alpha)
    }
}

impl From<Alpha> for f64 {
    fn from(alpha: Alpha) -> Self {
        alpha.0
    }
}
