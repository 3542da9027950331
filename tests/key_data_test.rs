mod common;

use common::{date, hhg_shipment, insert_item, insert_shipment, key_data, setup, CONTRACT_CODE};
use rust_decimal::Decimal;
use service_params::domain::{
    Address, ContractYear, DimensionType, DomesticServiceArea, FuelPrice, Millicents, MoveId,
    ParamOrigin, PaymentRequestId, PortLocation, PortLocationId, Pound, RateArea, ReServiceCode,
    ServiceItemDimension, ServiceItemId, ServiceItemParamName as N, ThousandthInches,
};
use service_params::lookups::ResolvedParam;
use service_params::planner::PlannerCall;
use service_params::{
    ErrorKind, LookupError, MockPlanner, ParamRequest, ResolveError, ServiceItemParamKeyData,
    ServiceParamsCache, NOT_IMPLEMENTED,
};
use std::str::FromStr;

// ===== Areas =====

#[tokio::test]
async fn test_service_area_by_zip3() {
    let env = setup().await;
    let area_id = env
        .repo
        .insert_domestic_service_area(&DomesticServiceArea {
            contract_id: env.contract.id,
            service_area: "004".to_string(),
            services_schedule: 2,
            sit_pd_schedule: 3,
        })
        .await
        .unwrap();
    env.repo
        .insert_zip3(env.contract.id, "350", area_id)
        .await
        .unwrap();

    let mut shipment = hhg_shipment(&env);
    shipment.pickup_address = Some(Address::new("35007"));
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dop, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::ServiceAreaOrigin).await.unwrap(), "004");
    assert_eq!(data.service_param_value(N::ServicesScheduleOrigin).await.unwrap(), "2");
    assert_eq!(data.service_param_value(N::SitScheduleOrigin).await.unwrap(), "3");

    let err = data
        .service_param_value(N::ServiceAreaDest)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let message = err.to_string();
    assert!(message.contains("945"), "{}", message);
    assert!(message.contains(CONTRACT_CODE), "{}", message);
}

#[tokio::test]
async fn test_rate_area_by_zip5() {
    let env = setup().await;
    let area_id = env
        .repo
        .insert_rate_area(&RateArea {
            contract_id: env.contract.id,
            code: "US68".to_string(),
            name: "California-South".to_string(),
        })
        .await
        .unwrap();
    env.repo
        .insert_zip5_rate_area(env.contract.id, "90210", area_id)
        .await
        .unwrap();

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Islh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::PriceAreaIntlOrigin).await.unwrap(), "US68");
    let err = data
        .service_param_value(N::PriceAreaIntlDest)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

async fn seed_service_area(env: &common::TestEnv, zip3: &str, area: &str, sit_schedule: i32) {
    let area_id = env
        .repo
        .insert_domestic_service_area(&DomesticServiceArea {
            contract_id: env.contract.id,
            service_area: area.to_string(),
            services_schedule: 1,
            sit_pd_schedule: sit_schedule,
        })
        .await
        .unwrap();
    env.repo
        .insert_zip3(env.contract.id, zip3, area_id)
        .await
        .unwrap();
}

async fn seed_rate_area(env: &common::TestEnv, zip5: &str, code: &str) {
    let area_id = env
        .repo
        .insert_rate_area(&RateArea {
            contract_id: env.contract.id,
            code: code.to_string(),
            name: code.to_string(),
        })
        .await
        .unwrap();
    env.repo
        .insert_zip5_rate_area(env.contract.id, zip5, area_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sit_areas_use_recorded_sit_addresses() {
    let env = setup().await;
    seed_service_area(&env, "902", "056", 1).await;
    seed_service_area(&env, "945", "080", 1).await;
    seed_service_area(&env, "350", "004", 3).await;
    seed_service_area(&env, "303", "016", 2).await;
    seed_rate_area(&env, "90210", "US68").await;
    seed_rate_area(&env, "94535", "US87").await;
    seed_rate_area(&env, "35007", "US47").await;
    seed_rate_area(&env, "30301", "US44").await;

    let mut shipment = hhg_shipment(&env);
    shipment.sit_origin_hhg_actual_address = Some(Address::new("35007"));
    shipment.sit_dest_final_address = Some(Address::new("30301"));
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Ddfsit, |_| {}).await;

    let planner = MockPlanner::new().with_zip5_miles(2400);
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::DistanceZipSitDest).await.unwrap(), "2400");
    assert_eq!(
        planner.calls(),
        vec![PlannerCall::Zip5 {
            origin: "94535".to_string(),
            destination: "30301".to_string(),
        }]
    );

    assert_eq!(data.service_param_value(N::SitServiceAreaOrigin).await.unwrap(), "004");
    assert_eq!(data.service_param_value(N::SitScheduleOrigin).await.unwrap(), "3");
    assert_eq!(data.service_param_value(N::SitServiceAreaDest).await.unwrap(), "016");
    assert_eq!(data.service_param_value(N::SitScheduleDest).await.unwrap(), "2");
    assert_eq!(data.service_param_value(N::SitRateAreaOrigin).await.unwrap(), "US47");
    assert_eq!(data.service_param_value(N::SitRateAreaDest).await.unwrap(), "US44");

    // non-SIT names keep using pickup and destination
    assert_eq!(data.service_param_value(N::ServiceAreaOrigin).await.unwrap(), "056");
    assert_eq!(data.service_param_value(N::ServiceAreaDest).await.unwrap(), "080");
    assert_eq!(data.service_param_value(N::PriceAreaIntlDest).await.unwrap(), "US87");
}

#[tokio::test]
async fn test_sit_dest_areas_fall_back_to_destination() {
    let env = setup().await;
    seed_service_area(&env, "945", "080", 5).await;
    seed_rate_area(&env, "94535", "US87").await;

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Ddfsit, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::SitServiceAreaDest).await.unwrap(), "080");
    assert_eq!(data.service_param_value(N::SitScheduleDest).await.unwrap(), "5");
    assert_eq!(data.service_param_value(N::SitRateAreaDest).await.unwrap(), "US87");

    let err = data
        .service_param_value(N::DistanceZipSitDest)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(planner.calls().is_empty());
}

// ===== Weights =====

#[tokio::test]
async fn test_shuttle_weight_is_capped_at_110_percent_of_estimate() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Doshut, |item| {
        item.estimated_weight = Some(Pound::new(1234));
        item.actual_weight = Some(Pound::new(1481));
    })
    .await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::WeightBilled).await.unwrap(), "1357");
    assert_eq!(data.service_param_value(N::WeightOriginal).await.unwrap(), "1481");
    assert_eq!(data.service_param_value(N::WeightEstimated).await.unwrap(), "1234");
}

#[tokio::test]
async fn test_billed_weight_floor_and_reweigh() {
    let env = setup().await;
    let mut shipment = hhg_shipment(&env);
    shipment.prime_actual_weight = Some(Pound::new(320));
    shipment.reweigh_weight = Some(Pound::new(300));
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::WeightBilled).await.unwrap(), "500");
    assert_eq!(data.service_param_value(N::WeightOriginal).await.unwrap(), "320");
    assert_eq!(data.service_param_value(N::WeightReweigh).await.unwrap(), "300");
    assert_eq!(data.service_param_value(N::WeightAdjusted).await.unwrap(), "");
    assert_eq!(data.service_param_value(N::FscMultiplier).await.unwrap(), "0.000417");
}

#[tokio::test]
async fn test_missing_actual_weight_is_conflict() {
    let env = setup().await;
    let mut shipment = hhg_shipment(&env);
    shipment.prime_actual_weight = None;
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    let err = data.service_param_value(N::WeightBilled).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(
        err.to_string(),
        format!(
            "failed ServiceParamValue WeightBilledLookup: Conflict: could not find actual weight for MTOShipmentID [{}]",
            shipment.id
        )
    );
}

// ===== Single-field lookups =====

#[tokio::test]
async fn test_dates_and_contract_year() {
    let env = setup().await;
    env.repo
        .insert_contract_year(&ContractYear {
            contract_id: env.contract.id,
            name: "Base Period Year 1".to_string(),
            start_date: date("2019-06-01"),
            end_date: date("2020-05-31"),
            escalation_compounded: Decimal::from_str("1.04071").unwrap(),
        })
        .await
        .unwrap();

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::RequestedPickupDate).await.unwrap(), "2020-03-15");
    assert_eq!(data.service_param_value(N::ActualPickupDate).await.unwrap(), "2020-03-16");
    assert_eq!(data.service_param_value(N::ReferenceDate).await.unwrap(), "2020-03-15");
    assert_eq!(data.service_param_value(N::IsPeak).await.unwrap(), "false");
    assert_eq!(data.service_param_value(N::ContractCode).await.unwrap(), CONTRACT_CODE);
    assert_eq!(
        data.service_param_value(N::ContractYearName).await.unwrap(),
        "Base Period Year 1"
    );
    assert_eq!(
        data.service_param_value(N::EscalationCompounded).await.unwrap(),
        "1.04071"
    );

    let err = data
        .service_param_value(N::MtoAvailableToPrimeAt)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_zips_and_markets() {
    let env = setup().await;
    let mut shipment = hhg_shipment(&env);
    shipment.destination_address = Some(Address::new("99501").with_oconus(Some(true)));
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Islh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::ZipPickupAddress).await.unwrap(), "90210");
    assert_eq!(data.service_param_value(N::ZipDestAddress).await.unwrap(), "99501");
    assert_eq!(data.service_param_value(N::MarketOrigin).await.unwrap(), "C");
    assert_eq!(data.service_param_value(N::MarketDest).await.unwrap(), "O");

    let err = data
        .service_param_value(N::ZipSitDestHhgFinalAddress)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_fuel_price_lookups() {
    let env = setup().await;
    env.repo
        .insert_fuel_price(&FuelPrice {
            publication_date: date("2020-03-09"),
            effective_date: date("2020-03-10"),
            end_date: date("2020-03-16"),
            fuel_price: Millicents::new(276_600),
        })
        .await
        .unwrap();

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Fsc, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::EiaFuelPrice).await.unwrap(), "276600");
    assert_eq!(
        data.service_param_value(N::FscPriceDifferenceInCents).await.unwrap(),
        "26.6"
    );
}

#[tokio::test]
async fn test_crating_lookups() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dcrt, |item| {
        item.dimensions.push(ServiceItemDimension {
            dimension_type: DimensionType::Crate,
            length: ThousandthInches::new(36_000),
            width: ThousandthInches::new(24_000),
            height: ThousandthInches::new(24_000),
        });
        item.standalone_crate = None;
    })
    .await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(data.service_param_value(N::CubicFeetBilled).await.unwrap(), "12.00");
    assert_eq!(data.service_param_value(N::DimensionLength).await.unwrap(), "36");
    assert_eq!(data.service_param_value(N::StandaloneCrate).await.unwrap(), "false");
    assert_eq!(
        data.service_param_value(N::StandaloneCrateCap).await.unwrap(),
        "1400.00"
    );
    let err = data.service_param_value(N::ExternalCrate).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_port_and_per_unit_lookups() {
    let env = setup().await;
    let port = PortLocation {
        id: PortLocationId::generate(),
        port_code: "SEA".to_string(),
        port_name: "SEATTLE TACOMA INTL".to_string(),
        postal_code: "98158".to_string(),
    };
    env.repo.insert_port_location(&port).await.unwrap();
    env.repo
        .insert_intl_accessorial_price(env.contract.id, ReServiceCode::Podfsc, "O", 2100)
        .await
        .unwrap();

    let mut shipment = hhg_shipment(&env);
    shipment.destination_address = Some(Address::new("99501").with_oconus(Some(true)));
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Podfsc, |item| {
        item.port_location_id = Some(port.id);
    })
    .await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    assert_eq!(
        data.service_param_value(N::PortName).await.unwrap(),
        "SEATTLE TACOMA INTL"
    );
    assert_eq!(data.service_param_value(N::PortZip).await.unwrap(), "98158");
    assert_eq!(data.service_param_value(N::PerUnitCents).await.unwrap(), "2100");
}

#[tokio::test]
async fn test_pricer_outputs_return_sentinel() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, None, &item).await;

    for name in [N::PriceRateOrFactor, N::PsiLinehaulDom, N::UncappedRequestTotal] {
        assert_eq!(data.service_param_value(name).await.unwrap(), NOT_IMPLEMENTED);
    }
}

// ===== Key data =====

#[tokio::test]
async fn test_every_name_is_bound() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new();
    let data = key_data(&env, &planner, None, &item).await;

    for name in N::ALL {
        assert!(data.registry().is_bound(*name), "{} is not bound", name);
    }
}

#[tokio::test]
async fn test_initialize_errors() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;
    let planner = MockPlanner::new();

    let request = ParamRequest::new(ServiceItemId::generate(), PaymentRequestId::generate(), env.mv.id);
    let err = ServiceItemParamKeyData::initialize(&env.repo, &planner, &env.config, None, request)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)));

    let request = ParamRequest::new(item.id, PaymentRequestId::generate(), MoveId::generate());
    let err = ServiceItemParamKeyData::initialize(&env.repo, &planner, &env.config, None, request)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)));
}

#[tokio::test]
async fn test_item_on_other_move_is_invalid_input() {
    let env = setup().await;
    let other = service_params::domain::Move {
        id: MoveId::generate(),
        locator: "OTHER1".to_string(),
        contract_id: env.contract.id,
        available_to_prime_at: None,
    };
    env.repo.insert_move(&other).await.unwrap();

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;
    let planner = MockPlanner::new();

    let request = ParamRequest::new(item.id, PaymentRequestId::generate(), other.id);
    let err = ServiceItemParamKeyData::initialize(&env.repo, &planner, &env.config, None, request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_item_without_shipment() {
    let env = setup().await;
    let item = insert_item(&env, None, ReServiceCode::Ms, |_| {}).await;

    let planner = MockPlanner::new();
    let mut cache = ServiceParamsCache::new();
    let mut data = key_data(&env, &planner, Some(&mut cache), &item).await;

    assert_eq!(data.service_param_value(N::ContractCode).await.unwrap(), CONTRACT_CODE);
    let err = data.service_param_value(N::DistanceZip).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    drop(data);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_cache_serves_shipment_scoped_values() {
    let env = setup().await;
    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let mut cache = ServiceParamsCache::new();
    cache.set(shipment.id, N::ZipPickupAddress, "11111".to_string());

    let planner = MockPlanner::new();
    let mut data = key_data(&env, &planner, Some(&mut cache), &item).await;

    assert_eq!(data.service_param_value(N::ZipPickupAddress).await.unwrap(), "11111");
    assert_eq!(data.service_param_value(N::ZipDestAddress).await.unwrap(), "94535");
    // Item-specific values are never cached.
    data.service_param_value(N::WeightBilled).await.unwrap();
    drop(data);

    assert_eq!(cache.get(shipment.id, N::ZipDestAddress), Some("94535"));
    assert_eq!(cache.get(shipment.id, N::WeightBilled), None);
}

async fn declare_params(env: &common::TestEnv, code: ReServiceCode, keys: &[(N, ParamOrigin, bool)]) {
    let service_id = env.repo.insert_re_service(code, code.as_str()).await.unwrap();
    for (name, origin, is_optional) in keys {
        let key_id = env
            .repo
            .insert_service_item_param_key(*name, *origin)
            .await
            .unwrap();
        env.repo
            .insert_service_param(service_id, key_id, *is_optional)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_resolve_service_item_params() {
    let env = setup().await;
    declare_params(
        &env,
        ReServiceCode::Dlh,
        &[
            (N::ContractCode, ParamOrigin::System, false),
            (N::DistanceZip, ParamOrigin::System, false),
            (N::WeightBilled, ParamOrigin::System, false),
            (N::WeightAdjusted, ParamOrigin::System, true),
            (N::PriceRateOrFactor, ParamOrigin::Pricer, false),
            (N::SitPaymentRequestStart, ParamOrigin::Prime, true),
        ],
    )
    .await;

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Dlh, |_| {}).await;

    let planner = MockPlanner::new().with_zip5_miles(372);
    let mut cache = ServiceParamsCache::new();
    let mut data = key_data(&env, &planner, Some(&mut cache), &item).await;

    let params = data.resolve_service_item_params().await.unwrap();
    assert_eq!(
        params,
        vec![
            ResolvedParam {
                name: N::ContractCode,
                value: CONTRACT_CODE.to_string(),
            },
            ResolvedParam {
                name: N::DistanceZip,
                value: "372".to_string(),
            },
            ResolvedParam {
                name: N::WeightAdjusted,
                value: String::new(),
            },
            ResolvedParam {
                name: N::WeightBilled,
                value: "1500".to_string(),
            },
        ]
    );

    let json = serde_json::to_value(&params[1]).unwrap();
    assert_eq!(json["name"], "DistanceZip");
    assert_eq!(json["value"], "372");
    drop(data);

    assert!(cache
        .service_item_needs_param_key(&env.repo, ReServiceCode::Dlh, N::DistanceZip)
        .await
        .unwrap());
    assert!(!cache
        .service_item_needs_param_key(&env.repo, ReServiceCode::Dlh, N::IsPeak)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_resolve_requires_prime_values() {
    let env = setup().await;
    declare_params(
        &env,
        ReServiceCode::Doasit,
        &[
            (N::SitPaymentRequestStart, ParamOrigin::Prime, false),
            (N::SitPaymentRequestEnd, ParamOrigin::Prime, false),
        ],
    )
    .await;

    let shipment = hhg_shipment(&env);
    insert_shipment(&env, &shipment).await;
    let item = insert_item(&env, Some(&shipment), ReServiceCode::Doasit, |_| {}).await;

    let planner = MockPlanner::new();
    let request = ParamRequest::new(item.id, PaymentRequestId::generate(), env.mv.id)
        .with_prime_value(N::SitPaymentRequestStart, "2020-07-21");
    let mut data = ServiceItemParamKeyData::initialize(&env.repo, &planner, &env.config, None, request)
        .await
        .unwrap();

    let err = data.resolve_service_item_params().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    match err {
        ResolveError::Param(err) => assert_eq!(err.param, N::SitPaymentRequestEnd),
        other => panic!("unexpected error {:?}", other),
    }
}
