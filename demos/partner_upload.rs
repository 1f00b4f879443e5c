//! Builds the multipart request an admin panel sends when creating a partner
//! with an icon, and prints it.

use flatform::{encode, forms::FormDataBuilder, map, File, Value};
use futures_lite::{future::block_on, io::AsyncReadExt};
use http::Request;

fn main() -> Result<(), flatform::Error> {
    env_logger::init();

    let icon = File::from_bytes("<svg xmlns=\"http://www.w3.org/2000/svg\"/>")
        .with_name("acme.svg")
        .with_content_type(mime::IMAGE_SVG);

    let partner = map! {
        "name" => "Acme",
        "website" => Value::Null,
        "tagIds" => vec![3, 5],
        "icon" => icon,
    };

    let request = FormDataBuilder::new()
        .fields(encode(&partner))
        .build()?
        .into_request(Request::post("https://admin.example.com/api/partners"))?;

    println!("{} {}", request.method(), request.uri());
    for (name, value) in request.headers() {
        println!("{}: {:?}", name, value);
    }
    println!();

    let mut body = request.into_body();
    let mut buf = String::new();
    block_on(body.read_to_string(&mut buf))?;
    print!("{}", buf);

    Ok(())
}
