pub(crate) mod pdfmarks;
