pub mod new_band;
