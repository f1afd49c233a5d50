//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`] with its
//! document, variables and raw response shape kept together in a module of
//! the same (snake case) name. Raw types mirror the API's JSON exactly;
//! `conversions` turns them into domain types.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

// No Storefront schema file is vendored, so the `GraphQLQuery` derive
// (which reads one at compile time) is unavailable; operations implement
// the trait by hand instead.

/// Declare a GraphQL operation backed by a hand-written document.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Shared raw shapes
// =============================================================================

/// Raw `MoneyV2`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    pub amount: String,
    #[allow(dead_code)]
    pub currency_code: String,
}

/// Raw `Image`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Raw `ProductPriceRange`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceRange {
    pub min_variant_price: RawMoney,
}

/// Raw node with only an ID.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIdNode {
    pub id: String,
}

/// Raw connection exposing `nodes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNodes<T> {
    pub nodes: Vec<T>,
}

/// Raw product fields requested for summaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProductSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub available_for_sale: bool,
    pub featured_image: Option<RawImage>,
    pub price_range: RawPriceRange,
    pub variants: RawNodes<RawIdNode>,
}

/// Raw collection fields requested for summaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollectionSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<RawImage>,
}

/// Raw user error from customer mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUserError {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Raw metafield value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMetafield {
    pub value: String,
}

// =============================================================================
// Customer operations
// =============================================================================

graphql_operation!(CustomerAccessTokenCreate, customer_access_token_create);

pub mod customer_access_token_create {
    use super::{Deserialize, RawUserError, Serialize};

    pub const OPERATION_NAME: &str = "CustomerAccessTokenCreate";
    pub const QUERY: &str = r"mutation CustomerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  customerAccessTokenCreate(input: $input) {
    customerAccessToken { accessToken expiresAt }
    customerUserErrors { code field message }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: Input,
    }

    #[derive(Debug, Serialize)]
    pub struct Input {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer_access_token: Option<Token>,
        #[serde(default)]
        pub customer_user_errors: Vec<RawUserError>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Token {
        pub access_token: Option<String>,
        pub expires_at: Option<String>,
    }
}

graphql_operation!(CustomerAccessTokenDelete, customer_access_token_delete);

pub mod customer_access_token_delete {
    use super::{Deserialize, RawUserError, Serialize};

    pub const OPERATION_NAME: &str = "CustomerAccessTokenDelete";
    pub const QUERY: &str = r"mutation CustomerAccessTokenDelete($customerAccessToken: String!) {
  customerAccessTokenDelete(customerAccessToken: $customerAccessToken) {
    deletedAccessToken
    userErrors { field message }
  }
}";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub customer_access_token: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_access_token_delete: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[allow(dead_code)]
        pub deleted_access_token: Option<String>,
        #[serde(default)]
        pub user_errors: Vec<RawUserError>,
    }
}

graphql_operation!(GetCustomer, get_customer);

pub mod get_customer {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetCustomer";
    pub const QUERY: &str = r"query GetCustomer($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    email
    firstName
    lastName
  }
}";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub customer_access_token: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Customer {
        pub id: String,
        pub email: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
    }
}

graphql_operation!(GetCustomerWishlist, get_customer_wishlist);

pub mod get_customer_wishlist {
    use super::{Deserialize, RawMetafield, Serialize};

    pub const OPERATION_NAME: &str = "GetCustomerWishlist";
    pub const QUERY: &str = r#"query GetCustomerWishlist($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    wishlist: metafield(namespace: "fernhouse", key: "wishlist") { value }
  }
}"#;

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub customer_access_token: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Customer {
        pub wishlist: Option<RawMetafield>,
    }
}

// =============================================================================
// Catalog operations
// =============================================================================

graphql_operation!(SearchProducts, search_products);

pub mod search_products {
    use super::{Deserialize, RawNodes, RawProductSummary, Serialize};

    pub const OPERATION_NAME: &str = "SearchProducts";
    pub const QUERY: &str = r"query SearchProducts($query: String!, $first: Int!) {
  products(first: $first, query: $query, sortKey: RELEVANCE) {
    nodes {
      id
      handle
      title
      availableForSale
      featuredImage { url altText }
      priceRange { minVariantPrice { amount currencyCode } }
      variants(first: 1) { nodes { id } }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub query: String,
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: RawNodes<RawProductSummary>,
    }
}

graphql_operation!(GetCollections, get_collections);

pub mod get_collections {
    use super::{Deserialize, RawCollectionSummary, RawNodes, Serialize};

    pub const OPERATION_NAME: &str = "GetCollections";
    pub const QUERY: &str = r"query GetCollections($first: Int!) {
  collections(first: $first, sortKey: TITLE) {
    nodes {
      id
      handle
      title
      description
      image { url altText }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub collections: RawNodes<RawCollectionSummary>,
    }
}

graphql_operation!(GetCollectionByHandle, get_collection_by_handle);

pub mod get_collection_by_handle {
    use super::{Deserialize, RawNodes, RawProductSummary, Serialize};

    pub const OPERATION_NAME: &str = "GetCollectionByHandle";
    pub const QUERY: &str = r"query GetCollectionByHandle($handle: String!, $first: Int!) {
  collection(handle: $handle) {
    id
    handle
    title
    description
    image { url altText }
    products(first: $first) {
      nodes {
        id
        handle
        title
        availableForSale
        featuredImage { url altText }
        priceRange { minVariantPrice { amount currencyCode } }
        variants(first: 1) { nodes { id } }
      }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub handle: String,
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<Collection>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Collection {
        #[serde(flatten)]
        pub summary: super::RawCollectionSummary,
        pub products: RawNodes<RawProductSummary>,
    }
}

// =============================================================================
// Checkout operations
// =============================================================================

graphql_operation!(CartCreate, cart_create);

pub mod cart_create {
    use super::{Deserialize, RawUserError, Serialize};
    use crate::shopify::types::CheckoutLine;

    pub const OPERATION_NAME: &str = "CartCreate";
    pub const QUERY: &str = r"mutation CartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart { id checkoutUrl }
    userErrors { code field message }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: Input,
    }

    #[derive(Debug, Serialize)]
    pub struct Input {
        pub lines: Vec<CheckoutLine>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub cart: Option<Cart>,
        #[serde(default)]
        pub user_errors: Vec<RawUserError>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Cart {
        #[allow(dead_code)]
        pub id: String,
        pub checkout_url: String,
    }
}
