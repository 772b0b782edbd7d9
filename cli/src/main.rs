use std::{str::FromStr, sync::Arc};

use cryptodevs_api::prelude::*;
use cryptodevs_client::prelude::*;
use ethers::{
    providers::{Http, Provider},
    utils::format_ether,
};

type Controller = SaleController<NodeWallet<Http>, EthSaleContract<Http>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Build controller
    let provider = Arc::new(Provider::<Http>::try_from(
        std::env::var("RPC").unwrap_or("http://127.0.0.1:8545".into()),
    )?);
    let contract_address =
        Address::from_str(&std::env::var("CONTRACT").unwrap_or(CONTRACT_ADDRESS.into()))?;
    let controller = Arc::new(SaleController::new(
        NodeWallet::new(provider.clone()),
        EthSaleContract::new(provider, contract_address),
    ));

    let command = std::env::var("COMMAND").unwrap_or("status".into());
    match command.as_str() {
        "status" => {
            status(&controller).await?;
        }
        "watch" => {
            watch(&controller).await?;
        }
        "start_presale" => {
            submit(&controller, SaleAction::StartSale).await?;
        }
        "presale_mint" => {
            submit(&controller, SaleAction::PresaleMint).await?;
        }
        "mint" => {
            submit(&controller, SaleAction::PublicMint).await?;
        }
        "metadata" => {
            metadata().await?;
        }
        _ => anyhow::bail!("Invalid command: {}", command),
    };

    Ok(())
}

async fn refresh(controller: &Controller) -> Result<ViewState, anyhow::Error> {
    controller.connect().await?;
    controller.refresh_phase().await;
    controller.refresh_mint_count().await;
    Ok(controller.view())
}

fn print_view(controller: &Controller, view: &ViewState) {
    println!("Crypto Devs");
    if let Some(session) = controller.session() {
        println!("  wallet: {}", short_address(&session.address));
    }
    println!("  sale: {}", view.phase);
    println!("  owner: {}", view.is_owner);
    println!("  {}", view.minted);
    println!("  > {}", view.offer());
}

async fn status(controller: &Controller) -> Result<(), anyhow::Error> {
    let view = refresh(controller).await?;
    print_view(controller, &view);
    Ok(())
}

async fn watch(controller: &Arc<Controller>) -> Result<(), anyhow::Error> {
    controller.connect_and_poll().await?;
    controller.refresh_phase().await;
    controller.refresh_mint_count().await;
    let mut last = controller.view();
    print_view(controller, &last);

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = controller.view();
                if view != last {
                    print_view(controller, &view);
                    last = view;
                }
            }
            _ = &mut ctrl_c => {
                controller.disconnect();
                return Ok(());
            }
        }
    }
}

async fn submit(controller: &Controller, action: SaleAction) -> Result<(), anyhow::Error> {
    refresh(controller).await?;
    if !action.fee().is_zero() {
        println!("Sending {} ether", format_ether(action.fee()));
    }
    let hash = controller.submit_action(action).await?;
    println!("Transaction: {:?}", hash);
    print_view(controller, &controller.view());
    Ok(())
}

async fn metadata() -> Result<(), anyhow::Error> {
    let id = std::env::var("ID").unwrap_or("0".into());
    let id = u64::from_str(&id)?;
    let metadata: serde_json::Value = reqwest::get(format!("{}{}", METADATA_URL, id))
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}
