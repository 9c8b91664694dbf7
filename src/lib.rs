// THEORY:
// This file is the entry point for the `pixelwise` library crate.
//
// The crate gives multi-dimensional pixel containers the arithmetic and
// comparison operators of their element types, including for operands of two
// different numeric types. The result type of a mixed operation comes from a
// single promotion table in `core_modules::promotion`.
//
// `ops` is the interface most users want: the `PixelOps` extension trait, the
// `+`/`*` impls and re-exports of the container types. `core_modules` holds the
// building blocks (containers, lazy views, the promotion table and the
// runtime-tagged containers) and stays public for code that needs to name the
// view types directly.

pub mod core_modules;
pub mod error;
pub mod ops;
