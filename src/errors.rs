// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get `Result` and `chain_err`.
use error_chain::error_chain;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ImageWriteError(::image::ImageError);
    }

    errors {
        MissingOutputPath {
            description("no output file given for a file rendering")
            display("no output file given for a file rendering")
        }

        ImageTooLarge(width: u32, height: u32, cell_pixels: u32) {
            description("maze bitmap dimensions overflow")
            display("a {}x{} maze at {} pixels per cell is too large for a bitmap",
                    width, height, cell_pixels)
        }
    }
}
