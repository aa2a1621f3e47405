use std::alloc::Layout;
use std::fmt;

/// An error returned by a fallible map operation.
///
/// A failed operation leaves the map exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested capacity exceeds the configured maximum table size.
    CapacityOverflow,

    /// The allocator failed to provide memory for the given layout.
    AllocError {
        /// The layout of the failed allocation.
        layout: Layout,
    },

    /// An entry could not be placed after growing the table.
    ///
    /// This only happens when many keys share the same hash, typically
    /// because of a degenerate or hostile hash function.
    ProbeExhausted,
}

impl Error {
    // Diverge with the behavior of `std` collections for this error.
    #[cold]
    pub(crate) fn raise(self) -> ! {
        match self {
            Error::AllocError { layout } => std::alloc::handle_alloc_error(layout),
            err => panic!("{err}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityOverflow => write!(f, "capacity overflow"),
            Error::AllocError { layout } => write!(
                f,
                "memory allocation of {} bytes failed",
                layout.size()
            ),
            Error::ProbeExhausted => write!(f, "probe sequence exhausted after growing the table"),
        }
    }
}

impl std::error::Error for Error {}

/// The error returned by [`try_insert`](crate::HashMap::try_insert) when the key already
/// exists, wrapped in [`TryInsertError::Occupied`].
///
/// Contains the existing value, and the value that was not inserted.
#[derive(Debug, PartialEq, Eq)]
pub struct OccupiedError<'a, V> {
    /// The value in the map that was already present.
    pub current: &'a V,
    /// The value which was not inserted, because the entry was already occupied.
    pub not_inserted: V,
}

impl<V: fmt::Debug> fmt::Display for OccupiedError<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key already exists with value {:?}, {:?} was not inserted",
            self.current, self.not_inserted
        )
    }
}

impl<V: fmt::Debug> std::error::Error for OccupiedError<'_, V> {}

/// The error returned by [`try_insert`](crate::HashMap::try_insert).
#[derive(Debug, PartialEq, Eq)]
pub enum TryInsertError<'a, V> {
    /// The key already exists.
    Occupied(OccupiedError<'a, V>),

    /// The map could not make room for the entry. The key and value are
    /// dropped and the map is unchanged.
    Failed(Error),
}

impl<V: fmt::Debug> fmt::Display for TryInsertError<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryInsertError::Occupied(err) => fmt::Display::fmt(err, f),
            TryInsertError::Failed(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<V: fmt::Debug> std::error::Error for TryInsertError<'_, V> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TryInsertError::Occupied(_) => None,
            TryInsertError::Failed(err) => Some(err),
        }
    }
}
