/// Compares equal to a cursor with nothing left to read right now.
///
/// For cursors over a fixed source this is the same as [`End`]. A stream
/// cursor that caught up with its producer is `Empty` but not yet `End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Empty;

/// Compares equal to a cursor that will never yield another token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct End;
