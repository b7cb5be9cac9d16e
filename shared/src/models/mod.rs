//! Wire models shared between the server and its clients

pub mod order;
pub mod product;
pub mod promo;

pub use order::{BuyerInfo, OrderItem, OrderRequest, ShareRequest, StatusResponse};
pub use product::{
    Product, ProductStatistics, ProductTotal, ProductUpdate, ProductView, SizeMap,
};
pub use promo::{PromoCheck, PromoCode, PromoDescriptor, PromoUpsert, PromoValidateRequest};
