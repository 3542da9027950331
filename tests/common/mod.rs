#![allow(dead_code)]

use chrono::NaiveDate;
use service_params::db::init_db;
use service_params::domain::{
    Address, Contract, ContractId, Move, MoveId, MtoServiceItem, MtoShipment, PaymentRequestId,
    PaymentRequestStatus, PaymentServiceItemId, PaymentServiceItemStatus, Pound, ReServiceCode,
    ServiceItemParamName, ShipmentType,
};
use service_params::lookups::{ParamRequest, ServiceItemParamKeyData, ServiceParamsCache};
use service_params::{Config, MockPlanner, Repository};
use tempfile::TempDir;

pub const CONTRACT_CODE: &str = "TRUSS_TEST";

pub struct TestEnv {
    pub repo: Repository,
    pub config: Config,
    pub contract: Contract,
    pub mv: Move,
    _temp_dir: TempDir,
}

pub async fn setup() -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Repository::new(pool);

    let contract = Contract {
        id: ContractId::generate(),
        code: CONTRACT_CODE.to_string(),
        name: "Test contract".to_string(),
    };
    repo.insert_contract(&contract).await.unwrap();

    let mv = Move {
        id: MoveId::generate(),
        locator: "TEST01".to_string(),
        contract_id: contract.id,
        available_to_prime_at: None,
    };
    repo.insert_move(&mv).await.unwrap();

    TestEnv {
        repo,
        config: Config::with_database_path(&db_path),
        contract,
        mv,
        _temp_dir: temp_dir,
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// HHG shipment from 90210 to 94535 with dates and weights set.
pub fn hhg_shipment(env: &TestEnv) -> MtoShipment {
    let mut shipment = MtoShipment::new(env.mv.id, ShipmentType::Hhg);
    shipment.pickup_address = Some(Address::new("90210"));
    shipment.destination_address = Some(Address::new("94535"));
    shipment.requested_pickup_date = Some(date("2020-03-15"));
    shipment.actual_pickup_date = Some(date("2020-03-16"));
    shipment.prime_estimated_weight = Some(Pound::new(1400));
    shipment.prime_actual_weight = Some(Pound::new(1500));
    shipment.sit_days_allowance = Some(90);
    shipment
}

pub async fn insert_shipment(env: &TestEnv, shipment: &MtoShipment) {
    env.repo.insert_shipment(shipment).await.unwrap();
}

pub async fn insert_item(
    env: &TestEnv,
    shipment: Option<&MtoShipment>,
    code: ReServiceCode,
    customize: impl FnOnce(&mut MtoServiceItem),
) -> MtoServiceItem {
    let mut item = MtoServiceItem::new(env.mv.id, shipment.map(|s| s.id), code);
    customize(&mut item);
    env.repo.insert_service_item(&item).await.unwrap();
    item
}

/// Record a payment request that billed `item` for the given SIT range.
pub async fn bill_sit_range(
    env: &TestEnv,
    item: &MtoServiceItem,
    status: PaymentRequestStatus,
    item_status: PaymentServiceItemStatus,
    start: &str,
    end: &str,
) -> PaymentRequestId {
    let id = PaymentRequestId::generate();
    env.repo
        .insert_payment_request(id, env.mv.id, status, 1)
        .await
        .unwrap();
    env.repo
        .insert_payment_service_item(
            PaymentServiceItemId::generate(),
            id,
            item.id,
            item_status,
            &[
                (ServiceItemParamName::SitPaymentRequestStart, start.to_string()),
                (ServiceItemParamName::SitPaymentRequestEnd, end.to_string()),
            ],
            1,
        )
        .await
        .unwrap();
    id
}

pub async fn pending_payment_request(env: &TestEnv) -> PaymentRequestId {
    let id = PaymentRequestId::generate();
    env.repo
        .insert_payment_request(id, env.mv.id, PaymentRequestStatus::Pending, 2)
        .await
        .unwrap();
    id
}

pub async fn key_data<'a>(
    env: &'a TestEnv,
    planner: &'a MockPlanner,
    cache: Option<&'a mut ServiceParamsCache>,
    item: &MtoServiceItem,
) -> ServiceItemParamKeyData<'a> {
    let request = ParamRequest::new(item.id, PaymentRequestId::generate(), env.mv.id);
    ServiceItemParamKeyData::initialize(&env.repo, planner, &env.config, cache, request)
        .await
        .expect("initialize failed")
}
