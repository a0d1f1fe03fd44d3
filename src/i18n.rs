//! User-facing message catalogue
//!
//! Every string a client can see goes through [`Messages`]. Log lines stay
//! in English.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Ar,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub locale: Locale,
    pub product_not_found: &'static str,
    pub click_recorded: &'static str,
    pub click_failed: &'static str,
    pub no_image: &'static str,
    pub image_failed: &'static str,
    pub upload_failed: &'static str,
    pub upload_missing_file: &'static str,
    pub upload_file_too_large: &'static str,
    pub upload_unavailable: &'static str,
    pub unknown_preset: &'static str,
    pub invalid_image_options: &'static str,
}

const AR: Messages = Messages {
    locale: Locale::Ar,
    product_not_found: "المنتج غير موجود",
    click_recorded: "تم تسجيل النقر بنجاح",
    click_failed: "حدث خطأ في تسجيل النقر",
    no_image: "لا توجد صورة",
    image_failed: "فشل في تحميل الصورة",
    upload_failed: "حدث خطأ أثناء رفع الصور",
    upload_missing_file: "لم يتم اختيار أي ملف",
    upload_file_too_large: "حجم الملف أكبر من الحد المسموح",
    upload_unavailable: "خدمة رفع الصور غير متاحة",
    unknown_preset: "نوع عرض الصورة غير معروف",
    invalid_image_options: "خيارات الصورة غير صالحة",
};

const EN: Messages = Messages {
    locale: Locale::En,
    product_not_found: "Product not found",
    click_recorded: "Click recorded successfully",
    click_failed: "Failed to record click",
    no_image: "No image",
    image_failed: "Failed to load image",
    upload_failed: "An error occurred while uploading images",
    upload_missing_file: "No file was provided",
    upload_file_too_large: "File exceeds the maximum allowed size",
    upload_unavailable: "Image upload is not available",
    unknown_preset: "Unknown image preset",
    invalid_image_options: "Invalid image options",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Ar => &AR,
            Locale::En => &EN,
        }
    }
}
