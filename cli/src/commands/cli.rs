use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fitbuddy", about = "FitBuddy session and favourites")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub confirm_password: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExercisesArgs {
    /// Muscle group; defaults to `catalog.default_muscle`.
    #[arg(long)]
    pub muscle: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DetailsArgs {
    /// Exact exercise name.
    pub name: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FavouriteAddArgs {
    pub name: String,

    /// Muscle group recorded when the catalog has no entry for `name`.
    #[arg(long)]
    pub muscle: Option<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FavouriteRemoveArgs {
    pub name: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavouritesCommand {
    List,
    Add(FavouriteAddArgs),
    Remove(FavouriteRemoveArgs),
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the restored session, active graph and favourites count.
    Status,
    Login(LoginArgs),
    Register(RegisterArgs),
    Logout,
    Exercises(ExercisesArgs),
    Details(DetailsArgs),
    #[command(subcommand)]
    Favourites(FavouritesCommand),
}
