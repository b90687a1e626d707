/// The EC2 instance identity document.
///
/// See <https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/instance-identity-documents.html>.
/// Every field is optional so documents from older or newer IMDS versions still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceIdentityDocument {
    pub devpay_product_codes: Option<Vec<String>>,
    pub marketplace_product_codes: Option<Vec<String>>,
    pub availability_zone: Option<String>,
    pub private_ip: Option<String>,
    pub version: Option<String>,
    pub region: Option<String>,
    pub instance_id: Option<String>,
    pub billing_products: Option<Vec<String>>,
    pub instance_type: Option<String>,
    pub account_id: Option<String>,
    pub pending_time: Option<String>,
    pub image_id: Option<String>,
    pub kernel_id: Option<String>,
    pub ramdisk_id: Option<String>,
    pub architecture: Option<String>,
}
