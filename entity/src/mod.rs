//! sea-orm entities for the transfer and harvest tracking schema.
//!
//! Projects are defined in the API crate, where CRUD routes are generated
//! for them; every other table lives here.

pub mod batches;
pub mod drop_positions;
pub mod library_plate_type_well_types;
pub mod library_plate_types;
pub mod library_plates;
pub mod library_well_types;
pub mod library_wells;
pub mod pins;
pub mod puck_types;
pub mod pucks;
pub mod transfers;
pub mod well_maps;
pub mod xtal_plate_type_well_types;
pub mod xtal_plate_types;
pub mod xtal_plates;
pub mod xtal_well_types;
pub mod xtal_wells;
