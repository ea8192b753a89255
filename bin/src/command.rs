use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "datadex", about = "DataDEX annotation marketplace client")]
pub enum Opt {
	///List tasks currently available for annotation
	Tasks {
		#[structopt(flatten)]
		shared: SharedOptions,
	},
	///Show one task and the actions the connected identity may take
	Show {
		#[structopt(flatten)]
		shared: SharedOptions,

		#[structopt(long)]
		task_id: u64,
	},
	///Upload a dataset and create a task, approving the reward first if needed
	Create {
		#[structopt(flatten)]
		shared: SharedOptions,

		///Dataset file to pin on IPFS
		#[structopt(long, parse(from_os_str))]
		dataset: PathBuf,

		///Reward in whole tokens, e.g. "50" or "0.5"
		#[structopt(long)]
		reward: String,

		#[structopt(long, default_value = "")]
		instructions: String,
	},
	///Fetch a task's dataset through the IPFS gateway into a local file
	Download {
		#[structopt(flatten)]
		shared: SharedOptions,

		#[structopt(long)]
		task_id: u64,

		///Where to store the dataset
		#[structopt(long, parse(from_os_str))]
		out: PathBuf,
	},
	///Claim a task for annotation
	Claim {
		#[structopt(flatten)]
		shared: SharedOptions,

		#[structopt(long)]
		task_id: u64,
	},
	///Upload an annotation result and submit it
	Submit {
		#[structopt(flatten)]
		shared: SharedOptions,

		#[structopt(long)]
		task_id: u64,

		///Annotation result file to pin on IPFS
		#[structopt(long, parse(from_os_str))]
		result: PathBuf,
	},
	///Claim the reward of a verified task
	ClaimReward {
		#[structopt(flatten)]
		shared: SharedOptions,

		#[structopt(long)]
		task_id: u64,
	},
	///Show wallet balance and marketplace allowance of the connected identity
	Balance {
		#[structopt(flatten)]
		shared: SharedOptions,
	},
}

#[derive(Debug, Clone, StructOpt)]
pub struct SharedOptions {
	///The client config file path
	#[structopt(long, parse(from_os_str))]
	pub config: Option<PathBuf>,
}

impl SharedOptions {
	pub fn config_path(&self) -> PathBuf {
		self.config.clone().unwrap_or_else(|| PathBuf::from("./config.json"))
	}
}
