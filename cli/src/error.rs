/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }

    pub fn message(&self) -> &str {
        &self.0
    }

    /// Print to stderr, headed with a red "Error"
    pub fn report(&self) {
        eprintln!("\n{}\n{self}", console::style("Error").red().bold());
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.1 {
            Some(details) => write!(f, "{}\n\n{}", self.0, console::style(details).dim()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Implement std::error::Error trait for Error
impl std::error::Error for Error {}

/// Automatically convert all eyre error reports
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&format!("{err:#}"), None))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use eyre::WrapErr;

    #[test]
    fn keeps_wrapped_error() {
        let result: eyre::Result<()> = Err(std::io::Error::other("disk is full"))
            .wrap_err(Error::new("Failed to write", Some("Check permissions.")));

        let error = Error::from(result.unwrap_err());
        assert_eq!(error.message(), "Failed to write");
    }

    #[test]
    fn wraps_foreign_errors() {
        let error = Error::from(eyre::eyre!("boom"));
        assert_eq!(error.message(), "boom");
    }
}
