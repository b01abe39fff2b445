pub mod d410_breakdowns;
