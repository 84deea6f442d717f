//! Symbol interning — compact handles for identifiers and keywords.
//!
//! A [`Symbol`] is a 4-byte handle into an [`Interner`]'s string table. Using
//! symbols instead of owned `String`s lets the parser and code generator
//! compare and hash names in O(1) instead of re-comparing bytes every time a
//! `let` binding or function name is looked up.
//!
//! Unlike a compiler meant to process many translation units concurrently,
//! this one compiles a single file on a single thread (see `spec.md` §5), so
//! the interner here is a plain owned struct rather than a global behind a
//! lock: there is exactly one `Interner`, created by the driver's `Session`
//! and threaded through the lexer and parser by value/reference.

use rustc_hash::FxHashMap;
use std::fmt;

/// An interned string handle.
///
/// Two symbols compare equal if and only if the strings they were interned
/// from compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Owns the string table a set of [`Symbol`]s are indices into.
///
/// # Examples
///
/// ```
/// use toyc_util::symbol::Interner;
///
/// let mut interner = Interner::new();
/// let a = interner.intern("x");
/// let b = interner.intern("x");
/// let c = interner.intern("y");
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(interner.resolve(a), "x");
/// ```
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Interns `text`, returning the existing symbol if it was already
    /// interned, or allocating a new one otherwise.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, sym);
        sym
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    ///
    /// Panics if `sym` was not produced by this interner.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}
