use crate::domain::payee::Payee;
use crate::domain::ports::{ProviderResponse, SharedProvider, commands};
use crate::domain::wallet::{Amount, TransactionReport, WalletBalance};
use crate::error::Result;
use crate::interfaces::response::{self, Extracted, balance, payees, transactions};

/// Read and pay operations against the provider wallet.
///
/// Read paths go through the normalizer and degrade to demo data when the
/// provider is unreachable, so a dashboard is never empty. Write paths
/// (payments, explicit payee creation) surface provider errors to the caller.
pub struct WalletService {
    provider: SharedProvider,
    wallet: u32,
}

impl WalletService {
    pub fn new(provider: SharedProvider, wallet: u32) -> Self {
        Self { provider, wallet }
    }

    pub async fn balance(&self) -> Extracted<WalletBalance> {
        match self
            .provider
            .ask(&commands::wallet_balance(self.wallet), None)
            .await
        {
            Ok(reply) => response::extract_balance(&reply),
            Err(err) => {
                tracing::warn!(error = %err, "balance request failed, serving demo data");
                Extracted::fallback(balance::demo_balance())
            }
        }
    }

    pub async fn payees(&self) -> Extracted<Vec<Payee>> {
        match self.provider.ask(commands::LIST_PAYEES, None).await {
            Ok(reply) => response::extract_payees(&reply),
            Err(err) => {
                tracing::warn!(error = %err, "payee listing failed, serving demo data");
                Extracted::fallback(payees::demo_payees())
            }
        }
    }

    pub async fn history(&self) -> Extracted<TransactionReport> {
        match self
            .provider
            .ask(&commands::transaction_history(self.wallet), None)
            .await
        {
            Ok(reply) => response::extract_report(&reply),
            Err(err) => {
                tracing::warn!(error = %err, "history request failed, serving demo data");
                Extracted::fallback(transactions::demo_report())
            }
        }
    }

    pub async fn send_payment(
        &self,
        amount: Amount,
        recipient: &str,
        description: &str,
    ) -> Result<ProviderResponse> {
        let reply = self
            .provider
            .ask(
                &commands::pay(amount.value(), recipient),
                Some(commands::pay_metadata(amount.value(), recipient, description)),
            )
            .await?;
        tracing::info!(%recipient, amount = %amount.value(), "payment sent");
        Ok(reply)
    }

    pub async fn register_payee(&self, email: &str, name: &str) -> Result<ProviderResponse> {
        self.provider
            .ask(&commands::add_payee(email, name), None)
            .await
    }
}
