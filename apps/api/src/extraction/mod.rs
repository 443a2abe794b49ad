// Resume upload: PDF bytes in, plain text out. Sits upstream of the analysis
// core; the extracted text is sent back to the client, not analyzed here.

pub mod handlers;
pub mod pdf;
