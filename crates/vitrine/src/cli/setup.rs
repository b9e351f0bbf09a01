use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vitrineapp::filter::SortOption;
use vitrineapp::model::PublishStatus;

#[derive(Parser, Debug)]
#[command(name = "vitrine", bin_name = "vitrine", version)]
#[command(about = "Back-office tool for a storefront catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Catalog file (overrides `data_file` from the config)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub data_file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the taxonomy with product counts
    #[command(display_order = 1)]
    Tree,

    /// Add or remove categories
    #[command(subcommand, display_order = 2)]
    Category(CategoryCommands),

    /// Add or remove subcategories
    #[command(subcommand, alias = "sub", display_order = 3)]
    Subcategory(SubcategoryCommands),

    /// Add, remove or rename attributes
    #[command(subcommand, alias = "attr", display_order = 4)]
    Attribute(AttributeCommands),

    /// List products, filtered, sorted and paged
    #[command(alias = "ls", display_order = 5)]
    Products(ProductArgs),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add { name: String, slug: String },

    /// Remove a category with its subcategories and attributes
    #[command(alias = "remove")]
    Rm { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SubcategoryCommands {
    /// Create a subcategory under a category
    Add {
        category_id: String,
        name: String,
        /// Free-form kind, e.g. color or size
        #[arg(value_name = "TYPE")]
        kind: String,
    },

    /// Remove a subcategory with its attributes
    #[command(alias = "remove")]
    Rm { category_id: String, id: String },
}

#[derive(Subcommand, Debug)]
pub enum AttributeCommands {
    /// Add an attribute to a subcategory
    Add {
        category_id: String,
        subcategory_id: String,
        name: String,
    },

    /// Remove an attribute
    #[command(alias = "remove")]
    Rm {
        category_id: String,
        subcategory_id: String,
        id: String,
    },

    /// Rename an attribute
    Rename {
        subcategory_id: String,
        id: String,
        new_name: String,
    },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    /// Case-insensitive name search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    /// Subcategory id (repeatable)
    #[arg(long = "subcategory", value_name = "ID")]
    pub subcategories: Vec<String>,

    /// Attribute id (repeatable)
    #[arg(long = "attribute", value_name = "ID")]
    pub attributes: Vec<String>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    pub sort: SortArg,

    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Let the store filter and page
    #[arg(long)]
    pub server: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Published,
    Draft,
}

impl From<StatusArg> for PublishStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Published => PublishStatus::Published,
            StatusArg::Draft => PublishStatus::Draft,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortOption::Relevance,
            SortArg::PriceAsc => SortOption::PriceAsc,
            SortArg::PriceDesc => SortOption::PriceDesc,
            SortArg::Newest => SortOption::Newest,
        }
    }
}
