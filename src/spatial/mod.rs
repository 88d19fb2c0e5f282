pub mod playfield;
