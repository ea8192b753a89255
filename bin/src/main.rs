use structopt::StructOpt;

mod command;
mod error;
mod handler;

use command::Opt;
use error::Error;

#[tokio::main]
async fn main() -> std::result::Result<(), Error> {
	env_logger::init();
	let opt = Opt::from_args();
	handler::dispatch(opt).await
}
