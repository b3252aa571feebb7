use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "crmdesk", bin_name = "crmdesk", version)]
#[command(about = "Manage CRM customers, leads and employees from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API root, e.g. http://localhost:5000/api/v1 (overrides config)
    #[arg(long, global = true, value_name = "URL", help_heading = "Options")]
    pub api_url: Option<String>,

    /// Use a throwaway in-memory backend instead of the API
    #[arg(long, global = true, help_heading = "Options")]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage customers
    #[command(alias = "c", display_order = 1)]
    Customers {
        #[command(subcommand)]
        action: RecordCommands,
    },

    /// Manage leads
    #[command(alias = "l", display_order = 2)]
    Leads {
        #[command(subcommand)]
        action: RecordCommands,
    },

    /// Manage employees
    #[command(alias = "emp", display_order = 3)]
    Employees {
        #[command(subcommand)]
        action: RecordCommands,
    },

    /// Get or set configuration
    #[command(display_order = 10)]
    Config {
        /// Configuration key (api-url, api-token, page-size)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List records, filtered and paginated
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Case-insensitive text matched against the searchable fields
        #[arg(short, long)]
        search: Option<String>,

        /// Status to show, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show every field of one record
    #[command(alias = "get", display_order = 2)]
    Show {
        /// Record id
        id: String,
    },

    /// Create a record
    #[command(alias = "n", display_order = 3)]
    Add {
        /// Field assignments, e.g. name="John Doe" email=j@x.com
        #[arg(value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },

    /// Change fields of an existing record
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Record id
        id: String,

        /// Field assignments, e.g. status=inactive
        #[arg(required = true, num_args = 1.., value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Record id
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the editable fields
    #[command(display_order = 6)]
    Fields,
}

/// Splits `field=value` at the first `=`. The value may be empty.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assignments() {
        assert_eq!(
            parse_assignment("name=John Doe").unwrap(),
            ("name".to_string(), "John Doe".to_string())
        );
        assert_eq!(
            parse_assignment("notes=a=b").unwrap(),
            ("notes".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("phone=").unwrap(),
            ("phone".to_string(), String::new())
        );
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn parses_list_with_defaults() {
        let cli = Cli::try_parse_from(["crmdesk", "customers", "list"]).unwrap();
        match cli.command {
            Commands::Customers {
                action: RecordCommands::List { search, status, page },
            } => {
                assert_eq!(search, None);
                assert_eq!(status, "all");
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_go_anywhere() {
        let cli = Cli::try_parse_from([
            "crmdesk", "leads", "add", "name=Big deal", "--offline", "-v",
        ])
        .unwrap();
        assert!(cli.offline);
        assert!(cli.verbose);
        match cli.command {
            Commands::Leads {
                action: RecordCommands::Add { fields },
            } => assert_eq!(fields, vec![("name".to_string(), "Big deal".to_string())]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn edit_requires_assignments() {
        assert!(Cli::try_parse_from(["crmdesk", "customers", "edit", "42"]).is_err());
        assert!(Cli::try_parse_from(["crmdesk", "customers", "edit", "42", "bogus"]).is_err());
    }

    #[test]
    fn employees_take_the_record_commands() {
        let cli = Cli::try_parse_from(["crmdesk", "emp", "show", "7"]).unwrap();
        match cli.command {
            Commands::Employees {
                action: RecordCommands::Show { id },
            } => assert_eq!(id, "7"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn delete_takes_yes() {
        let cli =
            Cli::try_parse_from(["crmdesk", "--api-url", "http://h", "c", "rm", "42", "-y"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://h"));
        assert!(matches!(
            cli.command,
            Commands::Customers {
                action: RecordCommands::Delete { yes: true, .. }
            }
        ));
    }
}
