// Audio ingest - upload validation and WAV decoding
//
// Everything here runs before the classification pipeline; rejected input
// never reaches it.

pub mod ingest;

pub use ingest::{decode_wav, validate_extension, AudioClip, ALLOWED_EXTENSIONS};
