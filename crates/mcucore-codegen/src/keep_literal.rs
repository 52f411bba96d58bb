//! Generates the `KeepLiteral` overloads in `progmem_string_data.h`.
//!
//! A string literal is split into fragments of [`FRAGMENT_LEN`] chars, the
//! last one padded with NULs. Each overload matches one count of trailing
//! NULs to discard and yields a `StringFragment` holding only the chars that
//! are kept:
//!
//! ```text
//! // Keep 2 characters, discard 14 nulls.
//! template <char C1, char C2, char... X>
//! auto KeepLiteral(DiscardCount<14>, StringFragment<C1>, StringFragment<C2>, StringFragment<X>...)
//! -> StringFragment<C1, C2>;
//! ```

use std::fmt;
use std::io;

use crate::CodegenError;

pub const FRAGMENT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepSize {
    pub keep_count: usize,
    pub discard_count: usize,
}

impl KeepSize {
    /// Names of the kept chars: `C1` through `Ck`.
    pub fn char_names(&self) -> Vec<String> {
        (1..=self.keep_count).map(|n| format!("C{n}")).collect()
    }

    pub fn write_block<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        let names = self.char_names();

        let template_params: Vec<String> = names
            .iter()
            .map(|c| format!("char {c}"))
            .chain(std::iter::once("char... X".to_string()))
            .collect();
        let inputs: Vec<String> = names
            .iter()
            .map(|c| format!("StringFragment<{c}>"))
            .chain(std::iter::once("StringFragment<X>...".to_string()))
            .collect();

        writeln!(
            w,
            "// Keep {} characters, discard {} nulls.",
            self.keep_count, self.discard_count
        )?;
        writeln!(w, "template <{}>", template_params.join(", "))?;
        writeln!(
            w,
            "auto KeepLiteral(DiscardCount<{}>, {})",
            self.discard_count,
            inputs.join(", ")
        )?;
        writeln!(w, "-> StringFragment<{}>;", names.join(", "))?;
        writeln!(w)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepLiteralEmitter {
    fragment_len: usize,
}

impl Default for KeepLiteralEmitter {
    fn default() -> Self {
        Self {
            fragment_len: FRAGMENT_LEN,
        }
    }
}

impl KeepLiteralEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every overload keeps at least one char and discards at least one NUL,
    /// so fragments shorter than two chars have nothing to generate.
    pub fn with_fragment_len(fragment_len: usize) -> Result<Self, CodegenError> {
        if fragment_len < 2 {
            return Err(CodegenError::FragmentTooShort(fragment_len));
        }
        Ok(Self { fragment_len })
    }

    pub fn fragment_len(&self) -> usize {
        self.fragment_len
    }

    pub fn sizes(&self) -> impl Iterator<Item = KeepSize> {
        let len = self.fragment_len;
        (1..len).map(move |keep_count| KeepSize {
            keep_count,
            discard_count: len - keep_count,
        })
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())?;
        out.flush()
    }
}

impl fmt::Display for KeepLiteralEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for size in self.sizes() {
            size.write_block(f)?;
        }
        Ok(())
    }
}
