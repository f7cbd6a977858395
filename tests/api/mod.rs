mod cell_id;
mod face;
mod latlng;
mod level;
mod token;
