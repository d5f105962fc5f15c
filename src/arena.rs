//! Bump allocation backing the whole front end.
//!
//! The lexer and parser never individually free anything they allocate;
//! everything they produce — interned text, token payloads, AST nodes —
//! lives in one [`bumpalo::Bump`] whose lifetime bounds the resulting
//! [`crate::ast::Module`]. This mirrors the block-list bump allocator in
//! the original C sources (`arena.h`/`arena.c`: a linked list of
//! >= 4096-byte blocks, a word-aligned bump pointer, `alloc`/
//! `alloc_zeroed`), which is exactly what `bumpalo::Bump` already
//! implements.

use bumpalo::Bump;

/// Copies `text` into `arena` and returns a slice with the arena's lifetime.
///
/// Used whenever a `Str` needs to outlive a transient buffer (a `format!`
/// result, a re-lexed placeholder body) rather than borrowing straight
/// from the source.
pub fn intern<'arena>(arena: &'arena Bump, text: &str) -> &'arena str {
    arena.alloc_str(text)
}

/// Allocates a single value in the arena and returns a stable reference.
pub fn alloc<'arena, T>(arena: &'arena Bump, value: T) -> &'arena T {
    arena.alloc(value)
}

/// Allocates a slice in the arena from an iterator, matching the
/// arena-backed "PtrVec" pattern the C parser uses for declaration/field/
/// param/arg lists (push then finalize into one contiguous allocation).
pub fn alloc_slice<'arena, T>(
    arena: &'arena Bump,
    items: impl IntoIterator<Item = T>,
) -> &'arena [T] {
    arena.alloc_slice_fill_iter(items)
}
