use super::{routes::*, types::*};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pushdrop Lookup",
        version = "v0.1.0",
        description = "Lookup service indexing live pushdrop token outputs. Receives output added/spent notifications from an overlay topic manager and answers point and bulk queries against the live-token index.",
        license(
            name = "Apache 2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.txt"
        )
    ),
    paths(
        lookup::lookup,
        outputs::output_added,
        outputs::output_spent,
    ),
    components(schemas(
        LookupRequest,
        LookupQueryParams,
        OutputAddedRequest,
        OutputSpentRequest,
        // --
        TokenUtxo,
    )),
)]
pub struct APIDoc;
