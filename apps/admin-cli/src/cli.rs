//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "catalog-admin")]
#[command(version, about = "Administer the catalog store: products, imports, orders and settings")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stock and order KPIs
    Dashboard,

    /// Bulk-create products from a spreadsheet
    Import {
        /// .xlsx, .xls or .ods file
        file: PathBuf,

        /// Sheet name (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Show the preview without creating anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List and adjust products
    Products {
        #[command(subcommand)]
        action: ProductsCommand,
    },

    /// List, report on and update orders
    Orders {
        #[command(subcommand)]
        action: OrdersCommand,
    },

    /// Show or toggle feature flags
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Run the pricing calculator locally
    Price(PriceArgs),
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered
    List {
        /// Name contains (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Category id
        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_enum)]
        stock: Option<StockArg>,

        #[arg(long, value_enum)]
        images: Option<ImagesArg>,
    },

    /// Set the stock of one product
    SetStock { id: String, stock: String },

    /// Delete one product
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StockArg {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImagesArg {
    With,
    Without,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    List {
        /// Customer name contains (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// pending, packed or completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Party-wise or item-wise report
    Report {
        #[arg(long, value_enum, default_value = "party")]
        by: ReportKind,
    },

    /// Change the status of one or more orders
    Status {
        /// pending, packed or completed
        status: String,

        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print an order slip
    Slip { id: String },

    /// Delete one or more orders
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Party,
    Item,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show every flag
    Show,

    /// Turn one flag on or off
    Set {
        /// Dotted key (ui.show_out_of_stock) or flag name (show_out_of_stock)
        key: String,

        #[arg(action = ArgAction::Set)]
        value: bool,
    },
}

/// Price inputs as typed. Values that do not parse count as 0.
#[derive(Debug, Default, Args)]
pub struct PriceArgs {
    #[arg(long)]
    pub purchase: Option<String>,

    /// Margin over purchase rate, in percent
    #[arg(long)]
    pub margin: Option<String>,

    /// Sales price (re-derives the margin)
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub mrp: Option<String>,

    /// Discount off MRP, in percent (switches the discount on)
    #[arg(long)]
    pub discount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        let cli =
            Cli::try_parse_from(["catalog-admin", "import", "items.xlsx", "--dry-run"]).unwrap();
        match cli.command {
            Command::Import { file, dry_run, sheet } => {
                assert_eq!(file, PathBuf::from("items.xlsx"));
                assert!(dry_run);
                assert!(sheet.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_settings_set() {
        let args = ["catalog-admin", "settings", "set", "enable_stock", "false"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings {
                action: SettingsCommand::Set { value: false, .. }
            }
        ));
        let args = ["catalog-admin", "settings", "set", "enable_stock", "maybe"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_global_flags() {
        let args = ["catalog-admin", "orders", "report", "--by", "item", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Orders {
                action: OrdersCommand::Report { by: ReportKind::Item }
            }
        ));
    }

    #[test]
    fn test_order_status_needs_ids() {
        assert!(Cli::try_parse_from(["catalog-admin", "orders", "status", "packed"]).is_err());
    }
}
