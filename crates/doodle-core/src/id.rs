use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for brush ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned identifier of a brush profile (`"thin_pencil"`, `"spray_small"`).
/// Internally a 4-byte `Spur` index.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushId(Spur);

impl BrushId {
    /// Intern a brush name, or return the existing id.
    pub fn intern(s: &str) -> Self {
        BrushId(INTERNER.get_or_intern(s))
    }

    /// Look up an id without interning it. Returns `None` for names that
    /// were never interned, so host input can't grow the interner.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(BrushId)
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for BrushId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brush:{}", self.as_str())
    }
}

impl fmt::Display for BrushId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BrushId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BrushId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BrushId::intern(&s))
    }
}
