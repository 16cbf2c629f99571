// Copyright (c) 2026 Gigworks Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Search engine scenarios: filtering, ranking (pay, deadline, distance),
//! pagination contract and edge cases.

mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{seed_gig, seed_gig_at, world};

use gigworks::application::search::SearchRankingEngine;
use gigworks::domain::error::ErrorKind;
use gigworks::domain::geo::{haversine_km, GeoPoint};
use gigworks::domain::gig::GigStatus;
use gigworks::domain::repository::GigRepository;
use gigworks::domain::search::{GigSearchParams, SortBy, SortOrder};

#[tokio::test]
async fn pay_range_filter_and_pay_ranking() {
    let w = world(0).await;
    for pay in [50_000, 80_000, 120_000, 200_000, 350_000, 500_000] {
        seed_gig(&w.repo, w.employer.id, pay).await;
    }
    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);

    let page = engine
        .search(GigSearchParams {
            min_pay: Some(100_000),
            max_pay: Some(350_000),
            sort_by: Some(SortBy::Pay),
            sort_order: Some(SortOrder::Asc),
            per_page: Some(12),
            ..Default::default()
        })
        .await
        .unwrap();

    let pays: Vec<i64> = page.gigs.iter().map(|g| g.pay).collect();
    assert_eq!(pays, vec![120_000, 200_000, 350_000]);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn descending_pay_ranking() {
    let w = world(0).await;
    for pay in [100, 300, 200] {
        seed_gig(&w.repo, w.employer.id, pay).await;
    }
    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);

    let page = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Pay),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        })
        .await
        .unwrap();
    let pays: Vec<i64> = page.gigs.iter().map(|g| g.pay).collect();
    assert_eq!(pays, vec![300, 200, 100]);
}

#[tokio::test]
async fn pagination_ranks_before_slicing() {
    let w = world(0).await;
    // 25 gigs with distinct pays 1..=25; rank ascending by pay.
    for pay in 1..=25 {
        seed_gig(&w.repo, w.employer.id, pay).await;
    }
    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);

    let page2 = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Pay),
            per_page: Some(12),
            page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();

    let pays: Vec<i64> = page2.gigs.iter().map(|g| g.pay).collect();
    assert_eq!(pays, (13..=24).collect::<Vec<i64>>());
    assert_eq!(page2.total, 25);
    assert_eq!(page2.total_pages, 3);

    // Past the end: empty page, same totals.
    let page4 = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Pay),
            per_page: Some(12),
            page: Some(4),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page4.gigs.is_empty());
    assert_eq!(page4.total, 25);
    assert_eq!(page4.total_pages, 3);
}

#[tokio::test]
async fn inverted_pay_range_yields_an_empty_set_not_an_error() {
    let w = world(0).await;
    seed_gig(&w.repo, w.employer.id, 100_000).await;
    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);

    let page = engine
        .search(GigSearchParams {
            min_pay: Some(200_000),
            max_pay: Some(100_000),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.gigs.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn default_status_filter_hides_non_open_gigs() {
    let w = world(1).await;
    let open = seed_gig(&w.repo, w.employer.id, 100).await;
    let closed = seed_gig(&w.repo, w.employer.id, 200).await;
    let app = w.workflow.apply(&w.workers[0].1, closed.id, None).await.unwrap();
    w.workflow.accept(&w.employer_ctx, app.id).await.unwrap();

    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);
    let page = engine.search(GigSearchParams::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.gigs[0].id, open.id);

    // Explicit status filter still reaches the others.
    let in_progress = engine
        .search(GigSearchParams {
            status: Some(GigStatus::InProgress),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_progress.total, 1);
    assert_eq!(in_progress.gigs[0].id, closed.id);
}

#[tokio::test]
async fn text_search_is_case_insensitive_over_title_and_description() {
    let w = world(0).await;
    let mut titled = seed_gig(&w.repo, w.employer.id, 100).await;
    let mut described = seed_gig(&w.repo, w.employer.id, 200).await;
    seed_gig(&w.repo, w.employer.id, 300).await;

    titled.title = "Senior PLUMBING fix".into();
    described.description = "needs some plumbing work in the basement".into();
    let mut uow = w.repo.begin().await.unwrap();
    uow.insert_gig(&titled).await.unwrap();
    uow.insert_gig(&described).await.unwrap();
    uow.commit().await.unwrap();

    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);
    let page = engine
        .search(GigSearchParams {
            search: Some("plumbing".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn category_filter_uses_contains_semantics() {
    let w = world(0).await;
    let mut multi = seed_gig(&w.repo, w.employer.id, 100).await;
    seed_gig(&w.repo, w.employer.id, 200).await; // category "general"

    multi.categories = vec!["outdoor".into(), "plumbing".into()];
    let mut uow = w.repo.begin().await.unwrap();
    uow.insert_gig(&multi).await.unwrap();
    uow.commit().await.unwrap();

    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);
    let page = engine
        .search(GigSearchParams {
            category: Some("plumbing".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.gigs[0].id, multi.id);
}

#[tokio::test]
async fn distance_ranking_orders_by_haversine() {
    let w = world(0).await;
    // Jakarta, Bandung, Surabaya; searcher stands in Jakarta.
    let jakarta = seed_gig_at(&w.repo, w.employer.id, 100, -6.2088, 106.8456, Duration::days(1)).await;
    let surabaya = seed_gig_at(&w.repo, w.employer.id, 200, -7.2575, 112.7521, Duration::days(2)).await;
    let bandung = seed_gig_at(&w.repo, w.employer.id, 300, -6.9175, 107.6191, Duration::days(3)).await;

    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);
    let page = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Distance),
            lat: Some(-6.2088),
            lng: Some(106.8456),
            ..Default::default()
        })
        .await
        .unwrap();

    let ids: Vec<_> = page.gigs.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![jakarta.id, bandung.id, surabaya.id]);

    // Sanity: the ranking matches explicit haversine distances.
    let origin = GeoPoint::new(-6.2088, 106.8456).unwrap();
    assert!(haversine_km(origin, bandung.location) < haversine_km(origin, surabaya.location));

    let farthest_first = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Distance),
            sort_order: Some(SortOrder::Desc),
            lat: Some(-6.2088),
            lng: Some(106.8456),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = farthest_first.gigs.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![surabaya.id, bandung.id, jakarta.id]);
}

#[tokio::test]
async fn distance_sort_without_location_falls_back_to_deadline() {
    let w = world(0).await;
    let later = seed_gig_at(&w.repo, w.employer.id, 100, 0.0, 0.0, Duration::days(10)).await;
    let sooner = seed_gig_at(&w.repo, w.employer.id, 200, 10.0, 10.0, Duration::days(1)).await;

    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);
    let page = engine
        .search(GigSearchParams {
            sort_by: Some(SortBy::Distance),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<_> = page.gigs.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);
}

#[tokio::test]
async fn out_of_range_input_fails_validation() {
    let w = world(0).await;
    let engine = SearchRankingEngine::new(w.repo.clone() as Arc<dyn GigRepository>);

    for params in [
        GigSearchParams { page: Some(0), ..Default::default() },
        GigSearchParams { per_page: Some(0), ..Default::default() },
        GigSearchParams { per_page: Some(51), ..Default::default() },
        GigSearchParams { lat: Some(90.5), lng: Some(0.0), ..Default::default() },
        GigSearchParams { lat: Some(0.0), lng: Some(-180.5), ..Default::default() },
        GigSearchParams { min_pay: Some(-1), ..Default::default() },
    ] {
        let err = engine.search(params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
