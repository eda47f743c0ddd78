use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the backend deployments the console can talk to.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Backend running on the developer's machine.
    #[default]
    Local,
    /// Backend reached from inside the docker-compose network.
    Docker,
}

impl Environment {
    /// Returns the API base URL associated with the environment.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8000/api".to_string(),
            Environment::Docker => "http://backend:8000/api".to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "docker" => Ok(Environment::Docker),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Docker => write!(f, "Docker"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LOCAL".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!("Docker".parse::<Environment>(), Ok(Environment::Docker));
        assert!("production".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_points_at_localhost() {
        assert_eq!(Environment::default().api_url(), "http://localhost:8000/api");
    }
}
