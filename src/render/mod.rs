pub(crate) mod backend;
pub(crate) mod inkscape;
pub(crate) mod raster;
