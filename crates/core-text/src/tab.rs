//! Indent unit inserted and removed by the indent commands.

use std::fmt;

/// Either `n` spaces or a single hard tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabUnit(String);

impl TabUnit {
    /// `width` spaces. A width of zero is promoted to one so the unit is never empty.
    pub fn spaces(width: usize) -> Self {
        Self(" ".repeat(width.max(1)))
    }

    pub fn hard_tab() -> Self {
        Self("\t".to_string())
    }

    /// Resolve from the host-facing `tab_size` / `insert_spaces` pair.
    /// `tab_size` only matters when inserting spaces.
    pub fn from_options(tab_size: usize, insert_spaces: bool) -> Self {
        if insert_spaces {
            Self::spaces(tab_size)
        } else {
            Self::hard_tab()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes; the unit is ASCII so this is also its char count.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TabUnit {
    fn default() -> Self {
        Self::spaces(2)
    }
}

impl fmt::Display for TabUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_unit() {
        let unit = TabUnit::from_options(4, true);
        assert_eq!(unit.as_str(), "    ");
        assert_eq!(unit.len(), 4);
    }

    #[test]
    fn hard_tab_ignores_size() {
        assert_eq!(TabUnit::from_options(4, false).as_str(), "\t");
    }

    #[test]
    fn zero_width_promoted() {
        assert_eq!(TabUnit::spaces(0).len(), 1);
    }
}
