//! Image buffers exchanged with the decode/encode collaborators.
//!
//! LDR exposures are 8-bit interleaved buffers ([`LdrImage`] owned, [`ImageU8`]
//! borrowed); HDR results are single-channel [`ImageF32`] grids.
pub mod f32;
pub mod io;
pub mod source;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::io::LdrImage;
pub use self::source::{DiskImageSource, ImageSource, MemoryImageSource};
pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
