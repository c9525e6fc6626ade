use field::DocumentFormat;

use crate::output::Output;

pub struct GlobalSettings {
    input_format: Option<DocumentFormat>,
    printer: Box<dyn Output>,
}

impl GlobalSettings {
    pub fn new(input_format: Option<DocumentFormat>, printer: Box<dyn Output>) -> Self {
        GlobalSettings {
            input_format,
            printer,
        }
    }

    /// Explicitly requested input format; `None` means detection from the file name.
    pub fn input_format(&self) -> Option<DocumentFormat> {
        self.input_format
    }

    pub fn printer(&self) -> &dyn Output {
        self.printer.as_ref()
    }
}
