use std::fmt;

/// The persisted collections of the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Voices,
    Dats,
    Royalties,
}

impl Collection {
    /// Every collection, in a fixed order.
    pub const ALL: [Collection; 3] = [Self::Voices, Self::Dats, Self::Royalties];

    /// Persisted key name.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Voices => "voices",
            Self::Dats => "dats",
            Self::Royalties => "royalties",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
