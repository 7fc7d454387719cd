pub mod fieldinfo;
pub mod globalinfo;
pub mod info;
pub mod params;
pub mod refresh;
