use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Recommend one exercise for a pain description and print it
    Recommend {
        #[arg(required = true, num_args = 1..)]
        pain_description: Vec<String>,
    },

    /// List the exercises the model may choose from
    Exercises,
}
