use serde::{Deserialize, Serialize};

use super::de;

/// A web-service function the token is allowed to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFunction {
    name: String,
    version: String,
}

getters!(SiteFunction {
    borrow name: String,
    borrow version: String,
});

/// A site-level feature toggle, `value` is `0` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedFeature {
    name: String,
    value: i64,
}

getters!(AdvancedFeature {
    borrow name: String,
    copy value: i64,
});

/// Result of `core_webservice_get_site_info`: the site and the token owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    sitename: String,
    username: String,
    firstname: String,
    lastname: String,
    fullname: String,
    lang: String,
    userid: i64,
    siteurl: String,
    userpictureurl: String,
    functions: Vec<SiteFunction>,
    downloadfiles: i64,
    uploadfiles: i64,
    release: String,
    version: String,
    mobilecssurl: String,
    advancedfeatures: Vec<AdvancedFeature>,
    #[serde(deserialize_with = "de::flag")]
    usercanmanageownfiles: bool,
    userquota: i64,
    usermaxuploadfilesize: i64,
    userhomepage: i64,
    userprivateaccesskey: String,
    siteid: i64,
    sitecalendartype: String,
    usercalendartype: String,
    #[serde(deserialize_with = "de::flag")]
    userissiteadmin: bool,
    theme: String,
    limitconcurrentlogins: i64,
    policyagreed: i64,
}

getters!(SiteInfo {
    borrow sitename: String,
    borrow username: String,
    borrow firstname: String,
    borrow lastname: String,
    borrow fullname: String,
    borrow lang: String,
    copy userid: i64,
    borrow siteurl: String,
    borrow userpictureurl: String,
    borrow functions: Vec<SiteFunction>,
    copy downloadfiles: i64,
    copy uploadfiles: i64,
    borrow release: String,
    borrow version: String,
    borrow mobilecssurl: String,
    borrow advancedfeatures: Vec<AdvancedFeature>,
    copy usercanmanageownfiles: bool,
    copy userquota: i64,
    copy usermaxuploadfilesize: i64,
    copy userhomepage: i64,
    borrow userprivateaccesskey: String,
    copy siteid: i64,
    borrow sitecalendartype: String,
    borrow usercalendartype: String,
    copy userissiteadmin: bool,
    borrow theme: String,
    copy limitconcurrentlogins: i64,
    copy policyagreed: i64,
});

impl SiteInfo {
    /// Whether the token may call `function`.
    pub fn has_function(&self, function: &str) -> bool {
        self.functions.iter().any(|f| f.name == function)
    }

    /// Value of an advanced feature, if the site reports it.
    pub fn feature(&self, name: &str) -> Option<i64> {
        self.advancedfeatures
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }
}
