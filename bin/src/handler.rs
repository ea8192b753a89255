use std::path::Path;

use datadex_market as market;
use datadex_market::{Action, Step, TaskForm};

use datadex_primitives::{
	types::status_label, utils::format_units, Address, Config, ConfigInstance, TaskId, TaskRecord,
};

use crate::{
	command::{Opt, SharedOptions},
	error::Result,
};

const CLIENT_LOG_TARGET: &str = "Client";

pub async fn dispatch(opt: Opt) -> Result<()> {
	match opt {
		Opt::Tasks { shared } => tasks(&build_instance(&shared)?).await,
		Opt::Show { shared, task_id } => show(&build_instance(&shared)?, task_id.into()).await,
		Opt::Create { shared, dataset, reward, instructions } =>
			create(&build_instance(&shared)?, &dataset, &reward, &instructions).await,
		Opt::Download { shared, task_id, out } =>
			download(&build_instance(&shared)?, task_id.into(), &out).await,
		Opt::Claim { shared, task_id } => claim(&build_instance(&shared)?, task_id.into()).await,
		Opt::Submit { shared, task_id, result } =>
			submit(&build_instance(&shared)?, task_id.into(), &result).await,
		Opt::ClaimReward { shared, task_id } =>
			claim_reward(&build_instance(&shared)?, task_id.into()).await,
		Opt::Balance { shared } => balance(&build_instance(&shared)?).await,
	}
}

// the one place clients, contracts and the signer are constructed; every
// handler below only borrows the instance
fn build_instance(shared: &SharedOptions) -> Result<ConfigInstance> {
	let config = Config::load_from_json(&shared.config_path())?;
	let instance = ConfigInstance::build(&config)?;
	log::info!(target: CLIENT_LOG_TARGET, "connected identity: {:?}", instance.signer_address);
	Ok(instance)
}

async fn tasks(config: &ConfigInstance) -> Result<()> {
	let best = config.chain_client.best_number().await.map_err(datadex_primitives::Error::from)?;
	log::info!(target: CLIENT_LOG_TARGET, "listing tasks at block #{:}", best);
	let tasks = market::get_available_tasks(&config.market_contract).await?;
	if tasks.is_empty() {
		println!("no tasks currently available for annotation");
		return Ok(())
	}
	for task in tasks {
		println!(
			"#{:} | reward: {:} | status: {:}",
			task.id,
			format_units(task.reward_amount),
			status_label(task.status)
		);
	}
	Ok(())
}

async fn show(config: &ConfigInstance, task_id: TaskId) -> Result<()> {
	let record = market::get_task_details(&config.market_contract, task_id).await?;
	// an unknown ordinal degrades the rendering, it never aborts it
	if let Err(e) = market::classify(&record) {
		log::warn!(target: CLIENT_LOG_TARGET, "{:}", e);
	}
	print_record(config, &record);
	Ok(())
}

async fn download(config: &ConfigInstance, task_id: TaskId, out: &Path) -> Result<()> {
	let record = market::get_task_details(&config.market_contract, task_id).await?;
	if record.ipfs_cid.is_empty() {
		return Err(market::Error::Validation(format!(
			"task #{:} has no dataset reference",
			record.id
		))
		.into())
	}
	let bytes = config.ipfs_client.fetch(&record.ipfs_cid).await?;
	tokio::fs::write(out, bytes).await?;
	println!("dataset of task #{:} written to {:}", record.id, out.display());
	Ok(())
}

fn print_record(config: &ConfigInstance, record: &TaskRecord) {
	println!("task #{:}", record.id);
	println!("  status:       {:}", status_label(record.status));
	println!("  reward:       {:}", format_units(record.reward_amount));
	println!("  requestor:    {:?}", record.requestor);
	if record.has_annotator() {
		let you = if record.annotator == config.signer_address { " (you)" } else { "" };
		println!("  annotator:    {:?}{}", record.annotator, you);
	}
	if !record.ipfs_cid.is_empty() {
		println!("  dataset:      {:}", record.ipfs_cid);
		println!("  download:     {:}", config.ipfs_client.gateway_url(&record.ipfs_cid));
	}
	if !record.instructions.is_empty() {
		println!("  instructions: {:}", record.instructions);
	}
	let actions = market::permitted_actions(record, config.signer_address);
	if actions.is_empty() {
		println!("  actions:      none");
	} else {
		println!("  actions:      {:?}", actions);
	}
}

async fn create(
	config: &ConfigInstance,
	dataset: &Path,
	reward: &str,
	instructions: &str,
) -> Result<()> {
	let mut form = TaskForm::new(Some(config.signer_address));
	form.set_instructions(instructions);
	form.set_reward(reward);

	let bytes = tokio::fs::read(dataset).await?;
	let file_name = dataset.file_name().and_then(|n| n.to_str()).unwrap_or("dataset");
	let cid = config.ipfs_client.upload(bytes, file_name).await?;
	println!("dataset pinned, cid: {:}", cid);
	form.set_dataset_reference(&cid);

	let seq = form.begin_allowance_check();
	let state = market::check_allowance(config, config.signer_address).await?;
	form.apply_allowance_check(seq, state);

	if form.reconcile().insufficient_funds {
		// approval is independent of funds; the shortage is only surfaced
		log::warn!(
			target: CLIENT_LOG_TARGET,
			"wallet balance {:} is below the reward {:}",
			format_units(form.allowance_state().balance),
			format_units(form.reward_amount())
		);
	}

	loop {
		match form.next_step() {
			Step::Blocked(reason) =>
				return Err(market::Error::Validation(format!("create-task blocked: {:}", reason))
					.into()),
			Step::NeedsDatasetUpload =>
				return Err(market::Error::Validation(
					"create-task blocked: dataset upload missing".to_owned(),
				)
				.into()),
			Step::NeedsApproval { shortfall } => {
				println!("1. approving {:} for the marketplace...", format_units(shortfall));
				market::increase_allowance(
					&config.token_contract,
					&config.signer,
					config.market_contract.address(),
					shortfall,
				)
				.await
				.map_err(|e| surface("approval", e))?;
				form.confirm_approval();
			},
			Step::ReadyToCreate => {
				println!("2. creating task...");
				market::create_task(
					&config.market_contract,
					&config.signer,
					form.dataset_cid(),
					form.reward_amount(),
					form.instructions(),
				)
				.await
				.map_err(|e| surface("task creation", e))?;
				form.confirm_created();
				println!("task created");
				return Ok(())
			},
		}
	}
}

async fn claim(config: &ConfigInstance, task_id: TaskId) -> Result<()> {
	let record = market::get_task_details(&config.market_contract, task_id).await?;
	ensure_permitted(&record, config.signer_address, Action::Claim)?;
	market::claim_task(&config.market_contract, &config.signer, task_id)
		.await
		.map_err(|e| surface("claim", e))?;
	println!("task #{:} claimed", task_id);
	Ok(())
}

async fn submit(config: &ConfigInstance, task_id: TaskId, result: &Path) -> Result<()> {
	let record = market::get_task_details(&config.market_contract, task_id).await?;
	ensure_permitted(&record, config.signer_address, Action::Submit)?;

	let bytes = tokio::fs::read(result).await?;
	let file_name = result.file_name().and_then(|n| n.to_str()).unwrap_or("annotation");
	let result_cid = config.ipfs_client.upload(bytes, file_name).await?;
	println!("annotation pinned, cid: {:}", result_cid);

	market::submit_annotation(&config.market_contract, &config.signer, task_id, &result_cid)
		.await
		.map_err(|e| surface("submission", e))?;
	println!("annotation for task #{:} submitted", task_id);
	Ok(())
}

async fn claim_reward(config: &ConfigInstance, task_id: TaskId) -> Result<()> {
	let record = market::get_task_details(&config.market_contract, task_id).await?;
	ensure_permitted(&record, config.signer_address, Action::ClaimReward)?;
	market::claim_reward(&config.market_contract, &config.signer, task_id)
		.await
		.map_err(|e| surface("reward claim", e))?;
	println!("reward for task #{:} claimed", task_id);
	Ok(())
}

async fn balance(config: &ConfigInstance) -> Result<()> {
	let state = market::check_allowance(config, config.signer_address).await?;
	println!("identity:  {:?}", config.signer_address);
	println!("balance:   {:}", format_units(state.balance));
	println!("allowance: {:}", format_units(state.allowance));
	Ok(())
}

// client-side gate mirroring the contract rules; the contract stays the
// final authority
fn ensure_permitted(record: &TaskRecord, viewer: Address, action: Action) -> Result<()> {
	let actions = market::permitted_actions(record, viewer);
	if actions.contains(&action) {
		return Ok(())
	}
	Err(market::Error::Validation(format!(
		"{:?} not permitted on task #{:} (status: {:})",
		action,
		record.id,
		status_label(record.status)
	))
	.into())
}

fn surface(context: &str, e: market::Error) -> market::Error {
	log::error!(target: CLIENT_LOG_TARGET, "{:} failed ({:?}): {:}", context, e.kind(), e);
	e
}
