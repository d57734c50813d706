use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::cascade::Attributes;
use crate::error::ModelError;
use crate::model::{Client, Contract, Invoice, Model, Supplier};
use crate::scalar;

#[derive(Deserialize, Debug)]
struct SupplierData {
    #[serde(default, deserialize_with = "scalar::opt_text")]
    invoice_number_format: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_text")]
    local_currency: Option<String>,
    #[serde(flatten)]
    attributes: Attributes,
}

#[derive(Deserialize, Debug)]
struct ContractData {
    client: String,
    #[serde(flatten)]
    attributes: Attributes,
}

#[derive(Deserialize, Debug)]
struct InvoiceData {
    contract: String,
    #[serde(flatten)]
    attributes: Attributes,
}

#[derive(Deserialize, Debug)]
struct Document {
    supplier: SupplierData,
    #[serde(default)]
    clients: BTreeMap<String, Attributes>,
    #[serde(default)]
    contracts: BTreeMap<String, ContractData>,
    #[serde(default)]
    invoices: Vec<InvoiceData>,
}

impl Model {
    /// Read and resolve the data file at `path`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path)?;
        let model = Self::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            clients = model.clients().count(),
            contracts = model.contracts().count(),
            invoices = model.invoices().len(),
            "loaded model"
        );
        Ok(model)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ModelError> {
        Self::build(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ModelError> {
        Self::build(serde_yaml::from_str(text)?)
    }

    fn build(document: Document) -> Result<Self, ModelError> {
        let Document {
            supplier,
            clients,
            contracts,
            invoices,
        } = document;

        let supplier = Supplier::new(
            supplier.attributes,
            supplier.invoice_number_format,
            supplier.local_currency,
        );

        let clients: BTreeMap<String, Arc<Client>> = clients
            .into_iter()
            .map(|(code, attributes)| {
                let client = Arc::new(Client::new(&code, attributes));
                (code, client)
            })
            .collect();

        let contracts = contracts
            .into_iter()
            .map(|(code, data)| {
                let client = clients.get(&data.client).ok_or_else(|| {
                    ModelError::Reference {
                        referrer: format!("Contract {}", code),
                        kind: "client",
                        code: data.client.clone(),
                    }
                })?;
                let contract = Contract::new(&code, Arc::clone(client), data.attributes);
                Ok((code, Arc::new(contract)))
            })
            .collect::<Result<BTreeMap<_, _>, ModelError>>()?;

        let mut seen = HashSet::new();
        let invoices = invoices
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                let contract = contracts.get(&data.contract).ok_or_else(|| {
                    ModelError::Reference {
                        referrer: format!("Invoice #{}", index + 1),
                        kind: "contract",
                        code: data.contract.clone(),
                    }
                })?;
                let invoice =
                    Invoice::new(index + 1, data.attributes, &supplier, Arc::clone(contract))?;
                if !seen.insert(invoice.code.clone()) {
                    return Err(ModelError::DuplicateInvoice { code: invoice.code });
                }
                Ok(invoice)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(Model::new(supplier, clients, contracts, invoices))
    }
}
